//! Board use-case services.
//!
//! # Responsibility
//! - Resolve drag gestures into task status changes.
//! - Track the active project the presentation layer is showing.
//! - Keep presentation collaborators decoupled from storage details.

pub mod board_service;
pub mod drag_session;
