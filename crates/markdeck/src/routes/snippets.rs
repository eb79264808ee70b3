//! Snippet viewing and submission handlers.

use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::error::AppError;
use crate::pages;
use crate::render;
use crate::state::AppState;
use crate::store::NewSnippet;

/// Category used when the request names none.
pub const DEFAULT_CATEGORY: &str = "default";

/// Category selector, from the query string or a form.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryParams {
    #[serde(default)]
    category: Option<String>,
}

impl CategoryParams {
    /// The requested category, or [`DEFAULT_CATEGORY`] when absent.
    ///
    /// A present but blank value is looked up as given.
    fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

/// Fields of the submission form. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct NewSnippetForm {
    #[serde(default)]
    content: String,
    #[serde(default)]
    category: String,
}

/// `GET /` - show a random snippet from `?category=` (default "default").
pub async fn show_random(
    State(state): State<AppState>,
    Query(params): Query<CategoryParams>,
) -> Result<Response, AppError> {
    render_random(&state, params.category()).await
}

/// `POST /shuffle` - same as `GET /` with the category taken from the form.
pub async fn shuffle(
    State(state): State<AppState>,
    Form(params): Form<CategoryParams>,
) -> Result<Response, AppError> {
    render_random(&state, params.category()).await
}

/// `GET /new` - the submission form.
pub async fn new_form() -> Response {
    super::html_response(pages::new_snippet_page())
}

/// `POST /new` - validate and store a snippet, then redirect home.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<NewSnippetForm>,
) -> Result<Response, AppError> {
    let snippet = NewSnippet::new(form.content, form.category)?;
    let stored = state.store.insert(&snippet).await?;

    tracing::info!(id = stored.id, category = %stored.category, "snippet added");

    Ok(Redirect::to("/").into_response())
}

async fn render_random(state: &AppState, category: &str) -> Result<Response, AppError> {
    let snippet = state.store.fetch_random(category).await?;
    tracing::debug!(id = snippet.id, category = %category, "serving snippet");

    let content = render::to_safe_html(&snippet.content);
    Ok(super::html_response(pages::index_page(&content, category)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(category: Option<&str>) -> CategoryParams {
        CategoryParams {
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn category_defaults_when_absent() {
        assert_eq!(params(None).category(), "default");
    }

    #[test]
    fn category_blank_is_kept() {
        assert_eq!(params(Some("")).category(), "");
        assert_eq!(params(Some("  ")).category(), "  ");
    }

    #[test]
    fn category_passes_through() {
        assert_eq!(params(Some("blog")).category(), "blog");
    }
}
