//! Domain records persisted by the core.
//!
//! # Responsibility
//! - Define the canonical project/item read models.
//! - Keep wire naming (serde) aligned with the external schema.

pub mod item;
pub mod project;
