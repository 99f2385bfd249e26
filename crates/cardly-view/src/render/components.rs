//! Shared HTML components used across card pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use maud::{Markup, PreEscaped, html};

/// Inline CSS for all pages.
///
/// The card itself is styled by `data-theme`; only a neutral base theme is
/// defined here.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#f5f5f7;--fg:#111;--fg2:#555;--fg3:#999;--accent:#b8860b;--accent-hover:#946c08;--surface:#fff;--border:rgba(0,0,0,.08);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:480px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}
svg.icon{width:18px;height:18px;fill:currentColor;stroke:none;vertical-align:-3px;flex-shrink:0}

.bcard{background:#111;color:#f5f5f5;border-radius:16px;padding:2rem 1.5rem;text-align:center;box-shadow:0 10px 30px rgba(0,0,0,.15)}
.bcard[data-theme="cyber-neon"]{background:linear-gradient(135deg,#0f0c29,#302b63);color:#e0f7ff}
.bcard[data-theme="nature-green"]{background:linear-gradient(135deg,#134e5e,#71b280)}
.bcard[data-theme="executive-black"]{background:#000}
.bcard[data-theme="artistic-purple"]{background:linear-gradient(135deg,#41295a,#2f0743)}
.bcard-logo{width:88px;height:88px;border-radius:50%;margin:0 auto 1rem;background:var(--accent);display:flex;align-items:center;justify-content:center;font-size:2rem;font-weight:700;color:#fff;text-transform:uppercase;overflow:hidden;position:relative}
.bcard-logo img{position:absolute;inset:0;width:100%;height:100%;object-fit:cover}
.bcard-name{font-size:1.75rem;font-weight:700;letter-spacing:-.02em}
.bcard-tagline{opacity:.8;margin-top:.25rem}
.bcard-badge{display:inline-block;margin-top:.75rem;font-size:.75rem;padding:.2rem .7rem;border-radius:100px;border:1px solid rgba(255,255,255,.3);text-transform:uppercase;letter-spacing:.05em}
.bcard-description{margin-top:1rem;opacity:.85;font-size:.95rem;white-space:pre-wrap;word-break:break-word}
.bcard-contacts{margin-top:1.5rem;display:flex;flex-direction:column;gap:.5rem}
.bcard-contacts a{color:inherit;display:flex;align-items:center;justify-content:center;gap:.5rem;padding:.5rem;border-radius:8px;background:rgba(255,255,255,.08)}
.bcard-contacts a:hover{background:rgba(255,255,255,.16);text-decoration:none}
.bcard-views{margin-top:1.25rem;font-size:.85rem;opacity:.7}

.actions{margin-top:1.25rem;display:flex;gap:.75rem;justify-content:center;flex-wrap:wrap}
.btn{display:inline-flex;align-items:center;gap:.4rem;padding:.55rem 1.1rem;background:var(--accent);color:#fff;border:none;border-radius:6px;font-size:.9rem;font-weight:500;cursor:pointer;text-decoration:none}
.btn:hover{background:var(--accent-hover);text-decoration:none}
.btn svg.icon{fill:#fff;width:16px;height:16px}

.share{margin-top:1.5rem;padding:1.25rem;border-radius:12px;background:var(--surface);border:1px solid var(--border);text-align:center}
.share h2{font-size:1rem;margin-bottom:.75rem}
.share-qr{width:160px;height:160px;margin:0 auto .75rem;display:block}
.share-links{display:flex;gap:.75rem;justify-content:center;flex-wrap:wrap;font-size:.9rem}
.share-url{font-family:var(--mono);font-size:.75rem;color:var(--fg3);word-break:break-all;margin-top:.75rem}

.footer{text-align:center;margin-top:1rem;padding-top:.75rem;font-size:.8rem;color:var(--fg3);width:100%;max-width:480px}

@media(prefers-color-scheme:dark){
:root{--bg:#0a0a0f;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--accent:#d4a017;--accent-hover:#e6b422;--surface:#111118;--border:rgba(255,255,255,.08)}
}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#f5f5f7;color:#1a1a2e;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#b8860b}
@media(prefers-color-scheme:dark){
body{background:#0a0a0f;color:#e0e0e8}
.error-page p{color:#aaa}
.error-page a{color:#d4a017}
}
"#;

/// Content-Security-Policy header value.
///
/// Allows inline styles and the inline scripts for copy-to-clipboard and the
/// address-bar rewrite. Images may come from any HTTPS origin (logos, QR).
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; script-src 'unsafe-inline'; img-src https: data:; connect-src 'self'; form-action 'none'; frame-ancestors 'none'";

/// Open Graph metadata for a page.
pub struct OpenGraphData<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// OG type (e.g., "profile", "website").
    pub og_type: &'a str,
    /// OG image URL (must be HTTPS).
    pub image: Option<&'a str>,
}

/// Render the full HTML page shell with `<head>`, OG tags, and body content.
pub fn page_shell(
    title: &str,
    description: &str,
    canonical_url: &str,
    og: OpenGraphData<'_>,
    body_content: Markup,
    site_name: &str,
) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                meta name="description" content=(description);
                link rel="canonical" href=(canonical_url);

                meta property="og:title" content=(og.title);
                meta property="og:description" content=(og.description);
                meta property="og:url" content=(canonical_url);
                meta property="og:site_name" content=(site_name);
                meta property="og:type" content=(og.og_type);
                @if let Some(image) = og.image {
                    meta property="og:image" content=(image);
                }

                meta name="twitter:card" content="summary";
                meta name="twitter:title" content=(og.title);
                meta name="twitter:description" content=(og.description);

                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body_content) }
                footer class="footer" {
                    a href="/" { "Create your own card on " (site_name) }
                }
            }
        }
    }
}

/// Copy icon (Phosphor copy, fill)
pub const ICON_COPY: &str = r#"<svg class="icon" viewBox="0 0 256 256"><path d="M216,32H88a8,8,0,0,0-8,8V80H40a8,8,0,0,0-8,8V216a8,8,0,0,0,8,8H168a8,8,0,0,0,8-8V176h40a8,8,0,0,0,8-8V40A8,8,0,0,0,216,32Zm-56,176H48V96H160Zm48-48H176V88a8,8,0,0,0-8-8H96V48H208Z"/></svg>"#;

/// Download icon
pub const ICON_DOWNLOAD: &str = r#"<svg class="icon" viewBox="0 0 256 256"><path d="M224,144v64a8,8,0,0,1-8,8H40a8,8,0,0,1-8-8V144a8,8,0,0,1,16,0v56H208V144a8,8,0,0,1,16,0Zm-101.66,5.66a8,8,0,0,0,11.32,0l40-40a8,8,0,0,0-11.32-11.32L136,124.69V32a8,8,0,0,0-16,0v92.69L93.66,98.34a8,8,0,0,0-11.32,11.32Z"/></svg>"#;

/// A button that copies `text` to the clipboard.
pub fn copy_button(text: &str, label: &str) -> Markup {
    // Serialising to a JSON string yields a valid, quoted JS literal.
    let literal = js_string(text);
    html! {
        button class="btn" type="button"
            onclick=(format!("navigator.clipboard.writeText({literal}).then(()=>{{this.lastChild.textContent=' Copied!'}})")) {
            (PreEscaped(ICON_COPY)) span { " " (label) }
        }
    }
}

/// Inline script replacing the visible URL with `path` without reloading.
pub fn replace_url_script(path: &str) -> Markup {
    html! {
        script { (PreEscaped(format!("history.replaceState(null,'',{});", js_string(path)))) }
    }
}

/// Encode `s` as a JavaScript string literal that is safe inside `<script>`.
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Format a large number with K/M suffixes for display.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
