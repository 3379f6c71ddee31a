//! Application layer with the portal controller and supporting services.

/// Portal view-controller.
pub mod portal;
/// Application services.
pub mod services;

pub use portal::{PortalController, PortalSettings, PortalState, PortalView};
pub use services::NotificationManager;
