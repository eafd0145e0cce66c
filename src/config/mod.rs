//! User configuration: `settings.kdl` in the platform config directory.

mod settings;

pub use settings::{DEFAULT_TIMEOUT_SECS, Settings};
