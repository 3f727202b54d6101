//! Text helpers shared by the analyzer and the retrievers.

use similar::TextDiff;

/// Character-level sequence similarity in [0, 1]: `2 * matched / (len(a) + len(b))`,
/// where matched is the number of characters in the longest common subsequence found by
/// the diff. Two empty strings are identical (1.0).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    f64::from(TextDiff::from_chars(a, b).ratio()).clamp(0.0, 1.0)
}

/// Cuts `s` to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Rounds to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ratio_identical_and_disjoint() {
        assert_eq!(sequence_ratio("abc", "abc"), 1.0);
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
        assert_eq!(sequence_ratio("", ""), 1.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_sequence_ratio_paraphrase_above_threshold() {
        let a = "how do i enroll for summer semester?";
        let b = "i want to enroll in the summer term";
        assert!(sequence_ratio(a, b) >= 0.4);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("grüße", 3), "grü");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(66.66, 1), 66.7);
    }
}
