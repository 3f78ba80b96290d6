//! `jobcfg-core` — building blocks shared by every job configuration.
//!
//! This crate contains the persisted-contract primitives only: the error
//! taxonomy, the tenant tri-state, the JSON codec and the converter traits.
//! No command execution, no IO.

pub mod converter;
pub mod error;
pub mod json;
pub mod tenant;

pub use converter::{JsonArrayOfObjectsConverter, JsonObjectConverter};
pub use error::{ConfigError, ConfigResult};
pub use json::{CodecOptions, JsonCodec, JsonObject};
pub use tenant::TenantScope;
