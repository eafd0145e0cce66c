use crate::core::distro::Distribution;
use crate::core::types::BackendKind;
use crate::error::Result;
use crate::packages::select_backend;
use crate::ui as output;
use crate::utils::machine_output;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Detection<'a> {
    distribution: &'a Distribution,
    backend: BackendKind,
    backend_available: bool,
}

pub fn run(distro: &Distribution, json: bool) -> Result<()> {
    let backend = select_backend(distro)?;
    let available = which::which(backend.name()).is_ok();

    if json {
        let detection = Detection {
            distribution: distro,
            backend,
            backend_available: available,
        };
        return machine_output::emit_json("detect", detection, vec![]);
    }

    output::keyval("Distribution", &distro.id);
    if !distro.version_id.is_empty() {
        output::keyval("Version", &distro.version_id);
    }
    if let Some(family) = distro.family {
        output::keyval("Family", family.as_str());
    }
    output::keyval("Backend", backend.name());
    if !available {
        output::warning(&format!("'{}' was not found on PATH", backend.name()));
    }
    Ok(())
}
