//! JSON API module.
//!
//! Currently the headline proxy only; HTML pages live in `pages`.

mod news;

pub use news::*;
