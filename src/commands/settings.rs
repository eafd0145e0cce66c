use crate::config::Settings;
use crate::error::Result;
use crate::ui as output;
use crate::utils::machine_output;
use std::path::Path;

pub fn run(settings: &Settings, source: Option<&Path>, json: bool) -> Result<()> {
    if json {
        return machine_output::emit_json("settings", settings, vec![]);
    }

    match source {
        Some(path) if path.exists() => output::info(&format!("Loaded from {}", path.display())),
        Some(path) => output::info(&format!("{} not found, using defaults", path.display())),
        None => {}
    }
    let timeout = if settings.timeout == 0 {
        "none".to_string()
    } else {
        format!("{}s", settings.timeout)
    };
    output::keyval("timeout", &timeout);
    output::keyval("elevation", &settings.elevation);
    output::keyval("verbose", &settings.verbose.to_string());
    output::keyval(
        "family",
        settings.family.map(|f| f.as_str()).unwrap_or("auto"),
    );
    Ok(())
}
