//! Page templates.
//!
//! All pages are maud templates. Dynamic text is escaped by maud; the only
//! unescaped value is the [`SafeHtml`] snippet body.

use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::render::SafeHtml;

/// Inline CSS for all pages.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#9900CC;--accent-hover:#7a00a3;--border:rgba(153,0,204,.15);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:680px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}

.card{padding:1.5rem;border:1px solid var(--border);border-radius:10px}
.category-badge{display:inline-block;color:var(--fg3);font-size:.78rem;padding:.2rem .6rem;border-radius:100px;font-weight:500;letter-spacing:.02em;text-transform:uppercase;margin-bottom:.75rem;border:1px solid var(--border)}

.snippet{font-size:1.05rem;line-height:1.75;color:var(--fg)}
.snippet h1,.snippet h2,.snippet h3,.snippet h4{font-weight:700;margin:1rem 0 .75rem;letter-spacing:-.01em}
.snippet h1{font-size:1.6rem}
.snippet h2{font-size:1.3rem}
.snippet h3{font-size:1.1rem}
.snippet p{margin:.75rem 0}
.snippet ul,.snippet ol{margin:.75rem 0;padding-left:1.5rem}
.snippet blockquote{border-left:3px solid var(--border);padding:.5rem 0 .5rem 1rem;margin:.75rem 0;color:var(--fg2)}
.snippet pre{border:1px solid var(--border);border-radius:6px;padding:.75rem 1rem;overflow-x:auto;margin:.75rem 0;font-size:.85rem;line-height:1.5}
.snippet code{font-family:var(--mono);font-size:.88em}
.snippet table{border-collapse:collapse;width:100%;margin:.75rem 0;font-size:.9rem}
.snippet th,.snippet td{border:1px solid var(--border);padding:.4rem .75rem;text-align:left}
.snippet hr{border:none;border-top:1px solid var(--border);margin:1.5rem 0}

.actions{margin-top:1.25rem;display:flex;gap:.75rem;align-items:center;flex-wrap:wrap}
form.inline{display:flex;gap:.5rem;align-items:center}
input[type=text],textarea{font:inherit;padding:.45rem .7rem;border:1px solid var(--border);border-radius:6px;background:transparent;color:var(--fg)}
textarea{width:100%;min-height:14rem;font-family:var(--mono);font-size:.9rem}
button{font:inherit;padding:.5rem 1.1rem;background:var(--accent);color:#fff;border:none;border-radius:6px;cursor:pointer;font-weight:500}
button:hover{background:var(--accent-hover)}
.field{display:flex;flex-direction:column;gap:.35rem;margin-bottom:1rem}
.field label{font-size:.85rem;color:var(--fg2);font-weight:600}

.footer{text-align:center;margin-top:1rem;padding-top:.75rem;font-size:.8rem;color:var(--fg3);width:100%;max-width:680px}

@media(prefers-color-scheme:dark){
:root{--bg:#0a0a0f;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--accent:#d946ef;--accent-hover:#e879f9;--border:rgba(191,0,255,.2)}
}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#1a1a2e;padding:1rem}
.error-page{text-align:center;max-width:480px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5;word-break:break-word}
.error-page a{color:#6c5ce7}
@media(prefers-color-scheme:dark){
body{background:#0f0f17;color:#e0e0e8}
.error-page p{color:#aaa}
.error-page a{color:#a29bfe}
}
"#;

/// Content-Security-Policy header value.
///
/// Inline styles only, no scripts, images over HTTPS, forms post back to
/// this origin.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; script-src 'none'; img-src https: data:; form-action 'self'; base-uri 'none'; frame-ancestors 'none'";

/// Render the full HTML page shell.
fn page_shell(title: &str, body_content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " — markdeck" }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body_content) }
                footer class="footer" {
                    a href="/" { "Random" } " · " a href="/new" { "Add a snippet" }
                }
            }
        }
    }
}

/// Main viewing page: one rendered snippet plus a shuffle form.
pub fn index_page(content: &SafeHtml, category: &str) -> Markup {
    let body = html! {
        div class="card" {
            span class="category-badge" { (category) }
            article class="snippet" {
                (content)
            }
        }
        div class="actions" {
            form class="inline" method="post" action="/shuffle" {
                input type="text" name="category" value=(category) aria-label="Category";
                button type="submit" { "Shuffle" }
            }
            a href="/new" { "Add a snippet" }
        }
    };

    page_shell(category, body)
}

/// Submission form for a new snippet.
pub fn new_snippet_page() -> Markup {
    let body = html! {
        div class="card" {
            h1 { "New snippet" }
            form method="post" action="/new" {
                div class="field" {
                    label for="category" { "Category" }
                    input type="text" id="category" name="category" required placeholder="default";
                }
                div class="field" {
                    label for="content" { "Markdown" }
                    textarea id="content" name="content" required {}
                }
                button type="submit" { "Save" }
            }
        }
    };

    page_shell("New snippet", body)
}

/// Error page showing the status and the error message.
pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " — markdeck" }
                meta name="robots" content="noindex";
                style { (PreEscaped(ERROR_CSS)) }
            }
            body {
                main class="error-page" {
                    h1 { (status.as_u16()) " " (title) }
                    p { (message) }
                    a href="/" { "Back to markdeck" }
                }
            }
        }
    }
}
