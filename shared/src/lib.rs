//! Shared types and models for the Sales Workflow Management Platform
//!
//! This crate contains types shared between the backend and other
//! components of the system.

pub mod models;
pub mod numbering;
pub mod types;
pub mod validation;

pub use models::*;
pub use numbering::*;
pub use types::*;
pub use validation::*;
