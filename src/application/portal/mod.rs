//! Portal view-controller.

mod controller;
mod service;
mod settings;
mod state;

pub use controller::PortalController;
pub use service::PortalService;
pub use settings::PortalSettings;
pub use state::{Command, FetchTicket, PortalEvent, PortalState, PortalView, Transition};
