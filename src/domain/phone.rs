//! Phone string helpers that do not need number metadata.

/// Strip every non-digit character, preserving a single leading `+`.
///
/// This is the last-resort comparison key for strings that fail strict
/// parsing. It never fails and may return an empty string.
///
/// # Example
///
/// ```
/// use phone_recon::domain::strip_to_digits;
///
/// assert_eq!(strip_to_digits("+44 (20) 7123-4567"), "+442071234567");
/// assert_eq!(strip_to_digits("ext. 12"), "12");
/// assert_eq!(strip_to_digits("n/a"), "");
/// ```
pub fn strip_to_digits(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if raw.starts_with('+') {
        format!("+{}", digits)
    } else {
        digits
    }
}

/// Convert a CamelCase type name (`FixedLineOrMobile`) into the
/// SCREAMING_SNAKE tag stored on parsed numbers (`FIXED_LINE_OR_MOBILE`).
pub fn number_type_tag(type_name: &str) -> String {
    let mut tag = String::with_capacity(type_name.len() + 4);
    for (i, c) in type_name.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            tag.push('_');
        }
        tag.push(c.to_ascii_uppercase());
    }
    tag
}
