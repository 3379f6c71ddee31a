mod footer_bar;
mod gif_grid;
mod header_bar;
mod input;

pub use footer_bar::{FocusContext, FooterBar, FooterBarStyle, KeyHint};
pub use gif_grid::{GifGrid, GifGridState};
pub use header_bar::{HeaderBar, HeaderBarStyle};
pub use input::TextInput;
