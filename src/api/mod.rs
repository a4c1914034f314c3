//! REST API module.
//!
//! One primary endpoint (`POST /api/ask`) fronts the whole pipeline; each
//! request is an independent, stateless cycle over the shared [`AppState`].

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
