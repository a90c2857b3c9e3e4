//! Shared building blocks for the configuration-object codecs.
//!
//! This crate provides:
//! - `CodecError`: the error kinds every decode/encode path surfaces
//! - `json`: raw JSON object maps and the `JsonCodec` trait
//! - `unknowns`: the unknown-field store carried by every entity
//! - `schema`: the declarative-schema contract (`Schema`, `Decoder`, `Properties`)
//! - `config`: environment-driven settings for the binaries

pub mod config;
pub mod error;
pub mod json;
pub mod schema;
pub mod unknowns;

pub use config::Config;
pub use error::*;
pub use json::{JsonCodec, RawMap};
pub use unknowns::Unknowns;
