pub mod app;
pub mod event;
pub mod input;
pub mod keymap;
pub mod layout;
pub mod scroll;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use layout::TextLayout;
pub use scroll::ScrollEngine;
pub use theme::Theme;
