pub mod companies;
pub mod control_plan;
pub mod measurements;

/// Trim, collapse inner whitespace runs to a single space and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Like [`sanitize_inline_text`] but keeps line breaks.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    input
        .trim()
        .lines()
        .map(sanitize_inline_text)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse a user-entered decimal. Accepts a comma as the decimal separator.
pub(crate) fn parse_decimal(input: &str) -> Option<f64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
