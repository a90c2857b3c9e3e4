//! Typed configuration objects with lossless JSON and declarative-schema codecs.
//!
//! This crate provides:
//! - `comparison`: the closed family of comparison variants, their registry
//!   and the per-variant codec
//! - `condition`: the envelope resolving a comparison by its discriminator
//! - `autotag`: auto-tag rules owning an ordered list of conditions
//! - `slo`: service-level objectives
//!
//! Every entity keeps the fields it does not model in an
//! [`Unknowns`](monconf_core::Unknowns) store and writes them back on encode.

#[macro_use]
mod domain;

pub mod autotag;
pub mod comparison;
pub mod condition;
pub mod slo;

pub use autotag::Rule;
pub use comparison::{Comparison, ComparisonType, TypedComparison};
pub use condition::Condition;
pub use domain::Domain;
pub use slo::Slo;

pub use monconf_core::schema::{Decoder, Properties, Resource};
pub use monconf_core::{CodecError, JsonCodec, Result, Unknowns};
