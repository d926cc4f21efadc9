//! Embed code generator.
//!
//! Produces a static HTML fragment with every visual property inlined, so it
//! renders the same when pasted into an arbitrary host page. The layout is the
//! fixed-width desktop variant of the preview.

use std::borrow::Cow;

use crate::config::BannerConfig;

/// Options for embed code generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedOptions {
    /// HTML-escape field values before interpolation.
    ///
    /// Off by default: values are emitted exactly as typed.
    pub escape: bool,
}

/// Generate the embed code for a banner with values interpolated verbatim.
pub fn generate_embed_code(config: &BannerConfig) -> String {
    generate_embed_code_with(config, EmbedOptions::default())
}

/// Generate the embed code with explicit options.
pub fn generate_embed_code_with(config: &BannerConfig, options: EmbedOptions) -> String {
    let title = first_line(&config.title);
    let subtitle = config.subtitle.as_str();
    let image = config.image_source.as_str();

    let (title, subtitle, image) = if options.escape {
        (escape_html(title), escape_html(subtitle), escape_html(image))
    } else {
        (Cow::Borrowed(title), Cow::Borrowed(subtitle), Cow::Borrowed(image))
    };

    format!(
        r#"<div style="background: linear-gradient(135deg, #6B46C1 0%, #8B5CF6 100%); padding: 48px; border-radius: 16px; display: flex; align-items: center; justify-content: space-between; color: white; font-family: 'Montserrat', sans-serif; max-width: 1200px; margin: 0 auto;">
  <div style="flex: 1; padding-right: 40px;">
    <div style="font-size: 14px; font-weight: 500; margin-bottom: 16px; opacity: 0.9;">{title}</div>
    <h1 style="font-size: 56px; font-weight: 700; line-height: 1.1; margin: 0;">{subtitle}</h1>
  </div>
  <div style="flex-shrink: 0; width: 400px;">
    <img src="{image}" alt="Character" style="width: 100%; height: auto; display: block;" />
  </div>
</div>"#
    )
}

/// Text up to, not including, the first `'\n'`.
///
/// Only line feed counts as a break; a preceding `'\r'` is kept.
pub fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or_default()
}

/// Escape text for use in HTML text content and quoted attributes.
fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn banner(title: &str, subtitle: &str, image: &str) -> BannerConfig {
        BannerConfig {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            image_source: image.to_string(),
            code_panel_open: false,
        }
    }

    #[test]
    fn default_banner_matches_expected_fragment() {
        let mut config = BannerConfig::default();
        config.toggle_code_panel();

        let html = generate_embed_code(&config);

        let expected = r#"<div style="background: linear-gradient(135deg, #6B46C1 0%, #8B5CF6 100%); padding: 48px; border-radius: 16px; display: flex; align-items: center; justify-content: space-between; color: white; font-family: 'Montserrat', sans-serif; max-width: 1200px; margin: 0 auto;">
  <div style="flex: 1; padding-right: 40px;">
    <div style="font-size: 14px; font-weight: 500; margin-bottom: 16px; opacity: 0.9;">Займы онлайн на карту</div>
    <h1 style="font-size: 56px; font-weight: 700; line-height: 1.1; margin: 0;">Первый заём бесплатно*</h1>
  </div>
  <div style="flex-shrink: 0; width: 400px;">
    <img src="https://cdn.poehali.dev/files/0ac31c7c-f429-4d9b-a457-774c18628a7a.jpg" alt="Character" style="width: 100%; height: auto; display: block;" />
  </div>
</div>"#;

        assert_eq!(html, expected);
    }

    #[test]
    fn truncates_title_to_first_line() {
        let html = generate_embed_code(&banner("Line1\nLine2", "Sub", "x.png"));

        assert!(html.contains(">Line1</div>"));
        assert!(!html.contains("Line2"));
    }

    #[test]
    fn keeps_multiline_subtitle() {
        let html = generate_embed_code(&banner("T", "one\ntwo", "x.png"));

        assert!(html.contains(">one\ntwo</h1>"));
    }

    #[test]
    fn empty_fields_produce_empty_text_nodes() {
        let html = generate_embed_code(&banner("", "", ""));

        assert!(html.contains("opacity: 0.9;\"></div>"));
        assert!(html.contains("margin: 0;\"></h1>"));
        assert!(html.contains("<img src=\"\" alt=\"Character\""));
        assert_eq!(html.matches("<div").count(), html.matches("</div>").count());
    }

    #[test]
    fn unreachable_url_is_emitted_unchanged() {
        let url = "https://unreachable.invalid/missing.png";

        let html = generate_embed_code(&banner("T", "S", url));

        assert!(html.contains(&format!("src=\"{}\"", url)));
    }

    #[test]
    fn verbatim_by_default() {
        let html = generate_embed_code(&banner("<b>hi</b>", "a & b", "x.png"));

        assert!(html.contains("<b>hi</b>"));
        assert!(html.contains("a & b"));
    }

    #[test]
    fn escapes_when_requested() {
        let config = banner("<b>hi</b>", "a & b", "x.png\" onerror=\"alert(1)");

        let html = generate_embed_code_with(&config, EmbedOptions { escape: true });

        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("src=\"x.png&quot; onerror=&quot;alert(1)\""));
    }

    #[test]
    fn first_line_only_splits_on_line_feed() {
        assert_eq!(first_line("a\r\nb"), "a\r");
        assert_eq!(first_line("single"), "single");
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("\nrest"), "");
    }

    proptest! {
        #[test]
        fn contains_subtitle_and_first_title_line(
            title in "(?s).*",
            subtitle in "(?s).*",
            image in "(?s).*",
        ) {
            let html = generate_embed_code(&banner(&title, &subtitle, &image));

            prop_assert!(html.contains(&subtitle));
            let title_node = format!("opacity: 0.9;\">{}</div>", first_line(&title));
            prop_assert!(html.contains(&title_node));

            // Whatever follows the first line break never reaches the output
            let head_only = generate_embed_code(&banner(first_line(&title), &subtitle, &image));
            prop_assert_eq!(&html, &head_only);
        }

        #[test]
        fn drops_text_after_first_line_break(
            head in "[^\n\u{2603}]{0,16}",
            rest in "[a-z]{1,8}\u{2603}(?s).{0,16}",
        ) {
            let title = format!("{}\n{}", head, rest);

            let html = generate_embed_code(&banner(&title, "Sub", "x.png"));

            let title_node = format!("opacity: 0.9;\">{}</div>", head);
            prop_assert!(html.contains(&title_node));
            prop_assert!(!html.contains(&rest));
        }

        #[test]
        fn generation_is_idempotent(title in ".*", subtitle in ".*") {
            let config = banner(&title, &subtitle, "x.png");

            prop_assert_eq!(generate_embed_code(&config), generate_embed_code(&config));
        }
    }
}
