//! Self-introduction (resume) documents: models, storage and HTTP handlers.

pub mod api;
pub mod models;
pub mod store;

pub use models::{Introduction, IntroductionDraft, IntroductionDto};
pub use store::IntroductionStore;
