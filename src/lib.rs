pub mod config;
pub mod error;
pub mod kernel;
pub mod media;
pub mod services;
pub mod store;

// Re-export specific items for convenient access
pub use config::MimicConfig;
pub use error::{MimicError, PlaybackError, Result};
pub use kernel::controller::PlaybackController;
pub use kernel::reactor::Reactor;
