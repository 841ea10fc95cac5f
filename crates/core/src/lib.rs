//! Domain layer for the pawtrail lost-and-found pet platform.
//!
//! Holds the pure, store-agnostic pieces: entity status enums, the domain
//! error taxonomy, the validating construction pipelines for posts and
//! reports, the settlement step model, and the photo storage collaborator
//! contract. Persistence lives in `pawtrail-db`; HTTP in `pawtrail-api`.

pub mod error;
pub mod post;
pub mod report;
pub mod settlement;
pub mod status;
pub mod storage;
pub mod types;
