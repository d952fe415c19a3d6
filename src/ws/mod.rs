//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams live attendance messages
//! filtered by session subscription.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
