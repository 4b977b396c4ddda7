/// Canonical form of a district or crop key: trimmed, case-folded, single-spaced.
pub fn normalize_key(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_whitespace() {
        assert_eq!(normalize_key("  Sant  Kabir Nagar "), "sant kabir nagar");
        assert_eq!(normalize_key("WHEAT"), "wheat");
    }
}
