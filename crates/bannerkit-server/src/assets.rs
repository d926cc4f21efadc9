//! Static assets served by the editor.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Stylesheet for the editor page, preview styles included.
    pub fn editor_css() -> String {
        format!("{}\n{}", PAGE_CSS, PREVIEW_CSS)
    }

    /// Runtime script for the editor page.
    pub fn editor_js() -> &'static str {
        EDITOR_JS
    }
}

/// Responsive preview layout. Stacks vertically on narrow screens.
pub const PREVIEW_CSS: &str = r#"/* Banner preview */
.banner {
  border-radius: 12px;
  overflow: hidden;
  box-shadow: 0 25px 50px -12px rgba(0, 0, 0, 0.25);
}

.banner__inner {
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: space-between;
  gap: 1rem;
  padding: 1.5rem;
}

.banner__text {
  flex: 1;
  color: white;
  text-align: center;
}

.banner__title {
  font-size: 0.75rem;
  font-weight: 500;
  margin-bottom: 0.5rem;
  opacity: 0.9;
}

.banner__subtitle {
  font-size: 1.5rem;
  font-weight: 700;
  line-height: 1.25;
  margin: 0;
}

.banner__image {
  flex-shrink: 0;
  width: 12rem;
}

.banner__image img {
  display: block;
  width: 100%;
  height: auto;
}

@media (min-width: 768px) {
  .banner {
    border-radius: 16px;
  }

  .banner__inner {
    flex-direction: row;
    gap: 0;
    padding: 3rem;
  }

  .banner__text {
    padding-right: 2.5rem;
    text-align: left;
  }

  .banner__title {
    font-size: 0.875rem;
    margin-bottom: 1rem;
  }

  .banner__subtitle {
    font-size: 3rem;
  }

  .banner__image {
    width: 24rem;
  }
}
"#;

const PAGE_CSS: &str = r#"/* Banner editor */
* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: 'Montserrat', system-ui, -apple-system, sans-serif;
  background: linear-gradient(135deg, #f9fafb 0%, #f3f4f6 100%);
  color: #111827;
  min-height: 100vh;
}

.page {
  max-width: 80rem;
  margin: 0 auto;
  padding: 1rem;
}

.page__header {
  text-align: center;
  margin-bottom: 1rem;
}

.page__header h1 {
  font-size: 1.5rem;
  margin: 0 0 0.5rem;
}

.page__header p {
  color: #4b5563;
  margin: 0;
}

.page__grid {
  display: grid;
  gap: 1rem;
}

.card {
  background: white;
  border: 1px solid #e5e7eb;
  border-radius: 0.5rem;
  padding: 1rem;
}

.settings h2,
.preview h2 {
  font-size: 1.25rem;
  margin: 0 0 1rem;
}

.settings label {
  display: block;
  font-size: 0.875rem;
  font-weight: 500;
  margin-top: 1rem;
}

.settings input,
.settings textarea {
  display: block;
  width: 100%;
  margin-top: 0.5rem;
  padding: 0.5rem 0.75rem;
  font: inherit;
  border: 1px solid #d1d5db;
  border-radius: 0.375rem;
}

.hint {
  font-size: 0.75rem;
  color: #6b7280;
  margin: 0.5rem 0 0;
}

.code {
  margin-top: 1.5rem;
  padding-top: 1rem;
  border-top: 1px solid #e5e7eb;
}

.code__box {
  position: relative;
  margin-top: 0.75rem;
}

.code__box textarea {
  font-family: ui-monospace, monospace;
  font-size: 0.75rem;
}

.code__box .btn--secondary {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
}

.btn {
  border: none;
  border-radius: 0.375rem;
  cursor: pointer;
  font: inherit;
  padding: 0.5rem 1rem;
  transition: background 0.15s;
}

.btn--primary {
  width: 100%;
  background: #9333ea;
  color: white;
}

.btn--primary:hover {
  background: #7e22ce;
}

.btn--secondary {
  background: #f3f4f6;
  color: #111827;
  font-size: 0.75rem;
}

.tip {
  margin-top: 1rem;
  background: #faf5ff;
  border-color: #e9d5ff;
  color: #581c87;
  font-size: 0.875rem;
}

.tip p {
  margin: 0;
}

.tip__title {
  font-weight: 600;
  margin-bottom: 0.25rem !important;
}

.toast {
  position: fixed;
  right: 1rem;
  bottom: 1rem;
  max-width: 22rem;
  background: #111827;
  color: white;
  padding: 0.75rem 1rem;
  border-radius: 0.5rem;
  box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.2);
}

.toast--error {
  background: #b91c1c;
}

.toast strong {
  display: block;
}

@media (min-width: 768px) {
  .page {
    padding: 2rem;
  }

  .page__header h1 {
    font-size: 2.25rem;
  }

  .card {
    padding: 1.5rem;
  }
}

@media (min-width: 1024px) {
  .page__grid {
    grid-template-columns: 1fr 1fr;
    gap: 2rem;
  }
}
"#;

const EDITOR_JS: &str = r#"// Banner editor runtime
(function() {
  'use strict';

  const $ = (id) => document.getElementById(id);

  const title = $('title');
  const subtitle = $('subtitle');
  const imageUrl = $('image-url');
  const imageFile = $('image');
  const toggle = $('toggle-code');
  const panel = $('code-panel');
  const code = $('embed-code');
  const copy = $('copy-code');
  const preview = $('preview');
  const toast = $('toast');

  let toastTimer = null;

  function showToast(heading, description, isError) {
    toast.innerHTML = '';
    const strong = document.createElement('strong');
    strong.textContent = heading;
    const span = document.createElement('span');
    span.textContent = description;
    toast.append(strong, span);
    toast.classList.toggle('toast--error', !!isError);
    toast.hidden = false;
    clearTimeout(toastTimer);
    toastTimer = setTimeout(() => { toast.hidden = true; }, 3000);
  }

  function apply(snapshot) {
    if (document.activeElement !== title) title.value = snapshot.title;
    if (document.activeElement !== subtitle) subtitle.value = snapshot.subtitle;
    if (document.activeElement !== imageUrl) imageUrl.value = snapshot.image_source;
    preview.innerHTML = snapshot.preview_html;
    code.value = snapshot.embed_code;
    panel.hidden = !snapshot.code_panel_open;
    toggle.textContent = snapshot.code_panel_open ? 'Скрыть код' : 'Получить код для вставки';
  }

  async function send(method, path, body) {
    const init = { method };
    if (body instanceof FormData) {
      init.body = body;
    } else if (body !== undefined) {
      init.headers = { 'content-type': 'application/json' };
      init.body = JSON.stringify(body);
    }
    const res = await fetch(path, init);
    if (res.status === 204) return;
    if (!res.ok) {
      const text = await res.text();
      showToast('Ошибка', text || res.statusText, true);
      return;
    }
    apply(await res.json());
  }

  function bindText(input, path) {
    let timer = null;
    input.addEventListener('input', () => {
      clearTimeout(timer);
      timer = setTimeout(() => send('PUT', path, { value: input.value }), 120);
    });
  }

  bindText(title, '/api/banner/title');
  bindText(subtitle, '/api/banner/subtitle');
  bindText(imageUrl, '/api/banner/image-url');

  imageFile.addEventListener('change', () => {
    const file = imageFile.files && imageFile.files[0];
    if (!file) return;
    const form = new FormData();
    form.append('file', file);
    send('POST', '/api/banner/image', form);
  });

  toggle.addEventListener('click', () => send('POST', '/api/banner/code-panel'));

  copy.addEventListener('click', async () => {
    try {
      await navigator.clipboard.writeText(code.value);
      showToast('Код скопирован!', 'Вставьте код на свой сайт');
    } catch (err) {
      showToast('Не удалось скопировать код', String(err), true);
    }
  });

  function connect(attempt) {
    const scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
    const ws = new WebSocket(scheme + location.host + '/__live');

    ws.onopen = () => { attempt = 0; };

    ws.onmessage = (event) => {
      const msg = JSON.parse(event.data);
      switch (msg.type) {
        case 'snapshot':
          apply(msg);
          break;
        case 'notice':
          showToast(msg.title, msg.description);
          break;
      }
    };

    ws.onclose = () => {
      if (attempt < 10) {
        setTimeout(() => connect(attempt + 1), 1000 * (attempt + 1));
      }
    };
  }

  connect(0);
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_css_includes_preview_styles() {
        let css = AssetPipeline::editor_css();

        assert!(css.contains(".page__grid"));
        assert!(css.contains(".banner__inner"));
        assert!(css.contains("@media (min-width: 768px)"));
    }

    #[test]
    fn editor_js_talks_to_api() {
        let js = AssetPipeline::editor_js();

        assert!(js.contains("/api/banner/title"));
        assert!(js.contains("navigator.clipboard.writeText"));
        assert!(js.contains("/__live"));
    }
}
