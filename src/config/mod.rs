//! Configuration for the Courtside server.

mod settings;

pub use settings::*;
