//! Custom Resource Definitions (CRDs) for repository-webhook.
//!
//! - `Repository`: a source code repository registration carrying the URL
//!   this webhook validates

mod repository;

pub use repository::*;
