//! Problem-notification listener.
//!
//! This crate provides:
//! - `Handler` trait receiving decoded problem events
//! - `ApiClient` looking up problem details and the cluster version
//! - An Axum router accepting the tenant's problem notifications

pub mod listener;
pub mod problems;
pub mod traits;

pub use listener::{router, serve, ListenerState};
pub use problems::{ApiClient, DefaultNotification, Problem};
pub use traits::{Handler, NotifyError, ProblemEvent, ProblemSource};
