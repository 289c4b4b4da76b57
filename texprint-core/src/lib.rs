//! texprint core library: configuration snapshot, layered loading, errors.
//!
//! Public API surface:
//! - [`types`]: [`TexConfig`] and its defaults
//! - [`settings`]: config file / environment layering and [`ConfigProvider`]
//! - [`error`]: [`ConfigError`]

pub mod error;
pub mod settings;
pub mod types;

pub use error::ConfigError;
pub use settings::{ConfigProvider, LayeredConfig};
pub use types::TexConfig;
