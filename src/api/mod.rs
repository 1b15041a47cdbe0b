//! HTTP API for the social graph

pub mod handlers;
pub mod query;
pub mod routes;
pub mod viewer;

pub use query::*;
pub use routes::create_router;
pub use viewer::Viewer;
