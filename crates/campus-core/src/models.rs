//! Domain models for Campus.
//!
//! Every record except [`tenant::Tenant`] itself carries the
//! `tenant_id` of the institute that owns it.

pub mod enrollment;
pub mod principal;
pub mod resource;
pub mod tenant;
