//! Server-rendered HTML pages.

mod admin;
mod article;
mod feed;

pub use admin::*;
pub use article::*;
pub use feed::*;

use askama::Template;
use axum::response::Html;

use crate::errors::AppError;

/// Render a template into an HTML response body.
fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}
