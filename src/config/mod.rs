//! Configuration management.
//!
//! [`OneRConfig`] gathers every knob of a training run: the tie-break method,
//! verbose ranking output and the [`PreprocessConfig`] used to discretize the
//! training table. It can be built fluently with [`ConfigBuilder`], read from
//! `.json` / `.toml` files, or overridden from `ONER_*` environment
//! variables.

pub mod core;

pub use self::core::{ConfigBuilder, OneRConfig};
pub use crate::dataset::preprocessing::{NumericStrategy, PreprocessConfig};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "oner.toml";

/// Default model file name
pub const DEFAULT_MODEL_FILE: &str = "model.json";
