/// Format a real so it always reads back as a real: `150000000.0`, `0.5`, `1e300`.
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        "nan".into()
    } else if value.is_infinite() {
        if value > 0.0 { "inf".into() } else { "-inf".into() }
    } else {
        // Debug keeps the trailing `.0` that Display drops.
        format!("{:?}", value)
    }
}

/// Join path segments with the separator, skipping empty ones.
pub fn join_path(separator: char, segments: &[&str]) -> String {
    let mut out = String::new();
    for seg in segments.iter().filter(|s| !s.is_empty()) {
        if !out.is_empty() {
            out.push(separator);
        }
        out.push_str(seg);
    }
    out
}
