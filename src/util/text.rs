//! Text and number helpers for progress lines and reports.

/// First `max_chars` characters of `text`, never splitting a character.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Round `value` to `places` decimal places.
///
/// Rounds the exact binary value in decimal, with exact ties going to the even
/// digit, so `0.85995` (stored as `0.859949999...`) becomes `0.8599`.
pub fn round_to(value: f64, places: u32) -> f64 {
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("Billing failed again", 7), "Billing");
        assert_eq!(preview("short", 60), "short");
        assert_eq!(preview("héllo wörld", 4), "héll");
        assert_eq!(preview("", 3), "");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.623_456_7, 4), 0.6235);
        assert_eq!(round_to(0.85, 4), 0.85);
        assert_eq!(round_to(12.344_9, 2), 12.34);
        assert_eq!(round_to(0.859_95, 4), 0.8599);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
    }
}
