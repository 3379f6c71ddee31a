//! Gifportal - a terminal portal for sharing and voting on GIF links stored
//! by an on-chain Solana program.
//!
//! The crate follows a layered layout: the domain holds value objects and
//! ports, the application layer sequences wallet and program calls, the
//! infrastructure layer talks JSON-RPC and signs transactions, and the
//! presentation layer draws the TUI.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the portal controller and notices.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "gifportal";
