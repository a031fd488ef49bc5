//! HTTP front end: the planner form page and a small JSON API.

mod page;
mod routes;
pub mod types;

pub use page::{markdown_blocks, PageRenderer};
pub use routes::{router, serve, AppState};
