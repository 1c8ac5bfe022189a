mod prompter;
mod status_bar;

pub use prompter::PrompterWidget;
pub use status_bar::StatusBarWidget;
