//! Human-readable port labels.

/// Display label for a port name.
///
/// Abbreviated instrument ports get their full names; everything else is
/// split on `_` and title-cased (`outlet_circuit_2` → "Outlet Circuit 2").
pub fn port_label(port: &str) -> String {
    match port {
        "SP" => return "Suction Pressure".to_string(),
        "DP" => return "Discharge Pressure".to_string(),
        "RPM" => return "Compressor Speed".to_string(),
        _ => {}
    }
    port.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_ports() {
        assert_eq!(port_label("SP"), "Suction Pressure");
        assert_eq!(port_label("RPM"), "Compressor Speed");
    }

    #[test]
    fn snake_case_ports() {
        assert_eq!(port_label("outlet_circuit_2"), "Outlet Circuit 2");
        assert_eq!(port_label("water_in_temp"), "Water In Temp");
        assert_eq!(port_label("inlet"), "Inlet");
    }
}
