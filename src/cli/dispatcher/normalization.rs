use crate::cli::args::GlobalFlags;
use crate::config::Settings;
use crate::core::types::Family;
use crate::error::{DistroPkgError, Result};
use crate::utils::paths;
use std::path::PathBuf;

/// Load settings and apply command-line overrides.
///
/// Also returns the settings path consulted, if one could be determined.
pub fn resolve_settings(global: &GlobalFlags) -> Result<(Settings, Option<PathBuf>)> {
    let source = match &global.config {
        Some(path) => Some(paths::expand_home(path)?),
        None => paths::settings_file().ok(),
    };

    let mut settings = match &source {
        Some(path) => Settings::load_from(path)?,
        None => Settings::default(),
    };

    if let Some(family) = &global.family {
        let family = family
            .parse::<Family>()
            .map_err(DistroPkgError::ConfigError)?;
        settings.family = Some(family);
    }
    if let Some(timeout) = global.timeout {
        settings.timeout = timeout;
    }
    if global.verbose {
        settings.verbose = true;
    }

    Ok((settings, source))
}
