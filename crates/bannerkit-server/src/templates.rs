//! Page templates for the editor and the preview.

use minijinja::{context, Environment};

use bannerkit_core::{placeholder_data_uri, BannerConfig, VisualTree, PLACEHOLDER_PATH};

use crate::assets::PREVIEW_CSS;

/// Template engine using minijinja. All templates are HTML and autoescaped.
pub struct PageTemplates {
    env: Environment<'static>,
}

impl PageTemplates {
    /// Create the engine with the bundled templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("preview.html".to_string(), PREVIEW_TEMPLATE.to_string())
            .expect("Failed to add preview template");

        env.add_template_owned("editor.html".to_string(), EDITOR_TEMPLATE.to_string())
            .expect("Failed to add editor template");

        env.add_template_owned("document.html".to_string(), DOCUMENT_TEMPLATE.to_string())
            .expect("Failed to add document template");

        Self { env }
    }

    /// Render the preview region for a visual tree.
    pub fn render_preview(&self, tree: &VisualTree) -> Result<String, minijinja::Error> {
        self.render_region(tree, tree.image.fallback)
    }

    fn render_region(&self, tree: &VisualTree, fallback: &str) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("preview.html")?;

        let image_src = if tree.image.is_placeholder() {
            fallback
        } else {
            tree.image.effective_src()
        };

        tmpl.render(context! {
            tree => tree,
            image_src => image_src,
            fallback => fallback,
        })
    }

    /// Render the full editor page.
    pub fn render_editor(
        &self,
        banner: &BannerConfig,
        preview_html: &str,
        embed_code: &str,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("editor.html")?;

        tmpl.render(context! {
            banner => banner,
            code_panel_open => banner.code_panel_open,
            preview => preview_html,
            embed_code => embed_code,
            placeholder => PLACEHOLDER_PATH,
        })
    }

    /// Render a standalone HTML page showing only the preview.
    ///
    /// The page is opened from disk, so the placeholder is inlined.
    pub fn render_document(&self, tree: &VisualTree) -> Result<String, minijinja::Error> {
        let preview = self.render_region(tree, &placeholder_data_uri())?;
        let tmpl = self.env.get_template("document.html")?;

        tmpl.render(context! {
            title => &tree.text.title,
            preview => preview,
            styles => PREVIEW_CSS,
        })
    }
}

impl Default for PageTemplates {
    fn default() -> Self {
        Self::new()
    }
}

const PREVIEW_TEMPLATE: &str = r##"<div class="banner" style="background: linear-gradient(135deg, #6B46C1 0%, #8B5CF6 100%);">
  <div class="banner__inner">
    <div class="banner__text">
      <div class="banner__title">{{ tree.text.title }}</div>
      <h1 class="banner__subtitle">{{ tree.text.subtitle }}</h1>
    </div>
    <div class="banner__image">
      <img src="{{ image_src }}" alt="{{ tree.image.alt }}" data-fallback="{{ fallback }}" data-status="{{ tree.image.status }}" onerror="this.onerror=null;this.src=this.dataset.fallback;">
    </div>
  </div>
</div>"##;

const EDITOR_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Конструктор баннеров</title>
  <link rel="stylesheet" href="/assets/editor.css">
</head>
<body>
  <div class="page">
    <header class="page__header">
      <h1>Конструктор баннеров</h1>
      <p>Создайте свой баннер и получите код для вставки</p>
    </header>

    <div class="page__grid">
      <section class="card settings">
        <h2>Настройки баннера</h2>

        <label for="title">Заголовок</label>
        <input id="title" name="title" value="{{ banner.title }}" placeholder="Займы онлайн на карту">

        <label for="subtitle">Основной текст</label>
        <textarea id="subtitle" name="subtitle" rows="2" placeholder="Первый заём бесплатно*">{{ banner.subtitle }}</textarea>

        <label for="image">Изображение</label>
        <input id="image" name="file" type="file" accept="image/*">
        <p class="hint">Или URL:</p>
        <input id="image-url" name="image_source" value="{{ banner.image_source }}" placeholder="https://example.com/image.jpg">

        <div class="code">
          <button id="toggle-code" class="btn btn--primary" type="button">
            {% if code_panel_open %}Скрыть код{% else %}Получить код для вставки{% endif %}
          </button>

          <div id="code-panel" class="code__panel"{% if not code_panel_open %} hidden{% endif %}>
            <div class="code__box">
              <textarea id="embed-code" readonly rows="8">{{ embed_code }}</textarea>
              <button id="copy-code" class="btn btn--secondary" type="button" title="Копировать">Копировать</button>
            </div>
            <p class="hint">Скопируйте этот код и вставьте на свой сайт</p>
          </div>
        </div>
      </section>

      <section class="preview">
        <h2>Предпросмотр</h2>
        <div id="preview">{{ preview | safe }}</div>

        <div class="card tip">
          <p class="tip__title">Совет по дизайну</p>
          <p>Используйте изображение на прозрачном фоне (PNG) для лучшего результата</p>
        </div>
      </section>
    </div>
  </div>

  <div id="toast" class="toast" role="status" hidden></div>
  <script src="/assets/editor.js"></script>
</body>
</html>"##;

const DOCUMENT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <style>{{ styles | safe }}</style>
</head>
<body>
  {{ preview | safe }}
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use bannerkit_core::{render_preview, render_preview_with, ImageStatus};

    #[test]
    fn preview_escapes_field_values() {
        let engine = PageTemplates::new();
        let mut banner = BannerConfig::default();
        banner.set_title("<script>alert(1)</script>");

        let html = engine.render_preview(&render_preview(&banner)).unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn preview_uses_placeholder_for_failed_image() {
        let engine = PageTemplates::new();
        let mut banner = BannerConfig::default();
        banner.set_image_from_url("https://unreachable.invalid/x.png");
        let tree = render_preview_with(&banner, &|_: &str| ImageStatus::Failed);

        let html = engine.render_preview(&tree).unwrap();

        assert!(html.contains("placeholder.svg"));
        assert!(!html.contains("unreachable.invalid"));
        assert!(html.contains(r#"data-status="failed""#));
    }

    #[test]
    fn preview_keeps_remote_src_with_fallback_hook() {
        let engine = PageTemplates::new();
        let banner = BannerConfig::default();

        let html = engine.render_preview(&render_preview(&banner)).unwrap();

        assert!(html.contains("cdn.poehali.dev"));
        assert!(html.contains("data-fallback="));
        assert!(html.contains(r#"data-status="deferred""#));
        assert!(html.contains("onerror="));
    }

    #[test]
    fn editor_hides_code_panel_by_default() {
        let engine = PageTemplates::new();
        let banner = BannerConfig::default();

        let html = engine.render_editor(&banner, "<div>p</div>", "<div>code</div>").unwrap();

        assert!(html.contains("Получить код для вставки"));
        assert!(html.contains(r#"class="code__panel" hidden"#));
        assert!(html.contains("&lt;div&gt;code"));
        assert!(html.contains("<div>p</div>"));
    }

    #[test]
    fn editor_shows_open_code_panel() {
        let engine = PageTemplates::new();
        let mut banner = BannerConfig::default();
        banner.toggle_code_panel();

        let html = engine.render_editor(&banner, "", "").unwrap();

        assert!(html.contains("Скрыть код"));
        assert!(!html.contains(r#"class="code__panel" hidden"#));
    }

    #[test]
    fn renders_standalone_document() {
        let engine = PageTemplates::new();
        let tree = render_preview(&BannerConfig::default());

        let html = engine.render_document(&tree).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Займы онлайн на карту</title>"));
        assert!(html.contains(".banner__inner"));
    }

    #[test]
    fn standalone_document_inlines_placeholder() {
        let engine = PageTemplates::new();
        let mut banner = BannerConfig::default();
        banner.set_image_from_url("");
        let tree = render_preview(&banner);
        assert!(tree.image.is_placeholder());

        let html = engine.render_document(&tree).unwrap();

        assert!(!html.contains("placeholder.svg"));
        assert!(html.contains("svg+xml;base64,"));
        assert_eq!(html.matches("svg+xml;base64,").count(), 2);
    }

    #[test]
    fn standalone_document_keeps_inline_fallback_for_remote_images() {
        let engine = PageTemplates::new();
        let tree = render_preview(&BannerConfig::default());

        let html = engine.render_document(&tree).unwrap();

        assert!(html.contains("cdn.poehali.dev"));
        assert!(!html.contains("placeholder.svg"));
        assert!(html.contains("svg+xml;base64,"));
    }
}
