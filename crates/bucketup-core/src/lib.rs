pub mod config;
pub mod logging;

pub mod artifact;
pub mod checksum;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod template;
pub mod updater;
pub mod url_model;

pub use error::UpdateError;
pub use updater::{update, UpdateReport};
