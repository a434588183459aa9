//! Data models shared by the headline reader and the posts admin.
//!
//! Field names follow the JSON emitted by the remote services.

mod article;
mod post;

pub use article::*;
pub use post::*;
