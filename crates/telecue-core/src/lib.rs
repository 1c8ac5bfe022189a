pub mod config;
pub mod error;
pub mod script;

pub use config::{Alignment, AppConfig, DisplayConfig, ScrollConfig, ScrollDirection};
pub use error::{Error, Result};
pub use script::Script;
