pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::routes::{build_router, AppState};
pub use config::{AppConfig, TomlConfig};
pub use crate::core::forwarder::Forwarder;
pub use domain::model::{Passthrough, Resource};
pub use utils::error::{AppError, ForwardError, Result};
