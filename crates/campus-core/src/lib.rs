//! Campus Core — domain models, access decisions, error types and
//! repository traits shared by every Campus crate.

pub mod decision;
pub mod error;
pub mod models;
pub mod repository;

pub use decision::{Decision, DenialReason};
pub use error::{CampusError, CampusResult};
