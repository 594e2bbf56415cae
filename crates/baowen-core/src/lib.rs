pub mod ai;
pub mod config;
pub mod error;
pub mod html;

pub use ai::{Article, Generator};
pub use config::AppConfig;
pub use error::{Error, Result};
