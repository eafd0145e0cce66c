use crate::error::Result;
use serde::Serialize;

pub const OUTPUT_VERSION: &str = "v1";

/// Stable wrapper around every `--json` payload.
#[derive(Debug, Serialize)]
pub struct MachineEnvelope<T>
where
    T: Serialize,
{
    pub version: String,
    pub command: String,
    pub ok: bool,
    pub data: T,
    pub errors: Vec<String>,
}

impl<T: Serialize> MachineEnvelope<T> {
    pub fn new(command: &str, data: T, errors: Vec<String>) -> Self {
        Self {
            version: OUTPUT_VERSION.to_string(),
            command: command.to_string(),
            ok: errors.is_empty(),
            data,
            errors,
        }
    }
}

pub fn emit_json<T>(command: &str, data: T, errors: Vec<String>) -> Result<()>
where
    T: Serialize,
{
    let envelope = MachineEnvelope::new(command, data, errors);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

#[cfg(test)]
mod tests;
