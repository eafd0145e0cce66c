/// Parse a size string into bytes using base-1024 multipliers.
///
/// Accepts an optional space between number and unit, decimal numbers and
/// the unit spellings the backends print: `B`, `k`/`K`/`KB`/`KiB`,
/// `m`/`M`/`MB`/`MiB`, `g`/`G`/`GiB`, `t`/`T`/`TiB`. Anything unparseable
/// (including an empty string) yields 0.
pub fn parse_size(input: &str) -> u64 {
    let compact: String = input.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return 0;
    }

    let split = compact
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(compact.len());
    let (number, unit) = compact.split_at(split);
    let number = number.replace(',', "");

    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };
    if !value.is_finite() || value < 0.0 {
        return 0;
    }

    let Some(multiplier) = unit_multiplier(unit) else {
        return 0;
    };

    (value * multiplier as f64).round() as u64
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    const KIB: u64 = 1024;
    match unit.to_lowercase().as_str() {
        "" | "b" | "bytes" | "byte" => Some(1),
        "k" | "kb" | "kib" => Some(KIB),
        "m" | "mb" | "mib" => Some(KIB.pow(2)),
        "g" | "gb" | "gib" => Some(KIB.pow(3)),
        "t" | "tb" | "tib" => Some(KIB.pow(4)),
        _ => None,
    }
}
