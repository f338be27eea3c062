pub mod bootstrap;
pub mod deploy;
pub mod error;
pub mod models;
pub mod provider;
pub mod utils;

pub use error::{InfraError, Result};
pub use models::SiteConfig;
