//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and the list projection into use-case
//!   level APIs.
//! - Keep frontends decoupled from storage details.

pub mod clock;
pub mod note_service;
