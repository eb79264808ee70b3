//! markdeck - random Markdown snippets served as sanitized HTML pages.
//!
//! A client asks for a category, the server picks a random matching snippet
//! from Postgres, renders its Markdown to HTML, sanitizes it, and returns a
//! page. A form lets clients add new snippets.
//!
//! # Architecture
//!
//! - **Store**: the `markdown` table behind the [`SnippetStore`] trait
//! - **Render**: pulldown-cmark followed by an ammonia allow-list, yielding [`SafeHtml`]
//! - **Pages**: maud templates; only `SafeHtml` is embedded unescaped
//! - **Routes**: axum handlers wiring store, renderer, and pages together
//!
//! # Security
//!
//! - Snippet HTML is sanitized before it reaches a template
//! - All other dynamic text is HTML-escaped by maud
//! - Content-Security-Policy forbids scripts on every page
//! - X-Frame-Options: DENY prevents clickjacking

pub mod config;
pub mod error;
pub mod pages;
pub mod render;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use render::{SafeHtml, to_safe_html};
pub use routes::router;
pub use state::AppState;
pub use store::{MemoryStore, NewSnippet, PgStore, Snippet, SnippetStore, StoreError};
