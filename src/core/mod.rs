pub mod forwarder;

pub use crate::domain::model::{Passthrough, Resource};
pub use crate::domain::ports::ConfigProvider;
pub use crate::utils::error::{ForwardError, Result};
