//! UI screens.

mod app;
mod notification_popup;
mod portal_screen;

pub use app::App;
pub use notification_popup::NotificationPopup;
pub use portal_screen::{PortalAction, PortalScreen, PortalScreenState};
