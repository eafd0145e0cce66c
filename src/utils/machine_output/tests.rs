use super::MachineEnvelope;
use crate::core::types::Package;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Payload {
    value: u32,
}

#[test]
fn envelope_ok_reflects_errors_empty() {
    let env = MachineEnvelope::new("search", Payload { value: 1 }, vec![]);
    let json = serde_json::to_value(&env).expect("serialize");
    assert_eq!(json["version"], "v1");
    assert_eq!(json["command"], "search");
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["value"], 1);
}

#[test]
fn envelope_with_errors_is_not_ok() {
    let env = MachineEnvelope::new("remove", Payload { value: 2 }, vec!["ghost".to_string()]);
    let json = serde_json::to_value(&env).expect("serialize");
    assert_eq!(json["ok"], false);
    assert_eq!(json["errors"][0], "ghost");
}

#[test]
fn packages_serialize_with_field_names() {
    let pkg = Package::new("htop").with_version("3.3.0-1");
    let env = MachineEnvelope::new("info", &pkg, vec![]);
    let json = serde_json::to_value(&env).expect("serialize");
    assert_eq!(json["data"]["name"], "htop");
    assert_eq!(json["data"]["version"], "3.3.0-1");
    assert_eq!(json["data"]["installed"], false);
}
