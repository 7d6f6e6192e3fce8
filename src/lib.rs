pub mod api;
pub mod cli;
pub mod error;
pub mod k8s;
pub mod metrics;
pub mod store;

pub use error::{BackendError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
