//! Posts admin state: the remote service seam and the client-side store.

mod backend;
mod store;

pub use backend::*;
pub use store::*;
