//! Label sanitization for diagram markup.

/// Replace every character outside `[A-Za-z0-9_ ]` with `_`.
pub fn sanitize_label(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
