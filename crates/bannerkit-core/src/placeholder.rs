//! Bundled placeholder graphic shown when the banner image fails to load.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// URL path the editor serves the placeholder from.
pub const PLACEHOLDER_PATH: &str = "/placeholder.svg";

/// Placeholder image (SVG).
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="1200" fill="none" viewBox="0 0 1200 1200">
  <rect width="1200" height="1200" fill="#EAEAEA" rx="3"/>
  <g opacity=".5">
    <path fill="#FAFAFA" d="M600.709 736.5c-75.454 0-136.621-61.167-136.621-136.62 0-75.454 61.167-136.621 136.621-136.621 75.453 0 136.62 61.167 136.62 136.621 0 75.453-61.167 136.62-136.62 136.62Z"/>
    <path stroke="#C9C9C9" stroke-width="2.418" d="M600.709 736.5c-75.454 0-136.621-61.167-136.621-136.62 0-75.454 61.167-136.621 136.621-136.621 75.453 0 136.62 61.167 136.62 136.621 0 75.453-61.167 136.62-136.62 136.62Z"/>
  </g>
  <path stroke="#C9C9C9" stroke-width="2.418" d="M450 450h300v300H450z"/>
  <path fill="#C9C9C9" d="m520 700 50-70 40 50 30-40 60 60H520Z"/>
  <circle cx="560" cy="540" r="24" fill="#C9C9C9"/>
</svg>
"##;

/// Placeholder as a self-contained `data:` URI, for pages opened without the
/// editor server.
pub fn placeholder_data_uri() -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(PLACEHOLDER_SVG))
}
