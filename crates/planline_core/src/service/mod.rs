//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep delivery layers (HTTP, CLI) decoupled from storage details.

pub mod item_service;
pub mod order_service;
pub mod project_service;
