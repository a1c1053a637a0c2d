//! Word tokenizer shared by the skill matcher, keyword extractor and ATS scorers.

/// Splits text into maximal alphanumeric runs, in order, without deduplication.
///
/// Case is left untouched; callers normalize per comparison.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Collapses every whitespace run to a single space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  --  ,. ").is_empty());
    }

    #[test]
    fn test_splits_on_non_alphanumeric_separators() {
        assert_eq!(
            tokenize("Node.js, C++ & CI/CD"),
            vec!["Node", "js", "C", "CI", "CD"]
        );
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        assert_eq!(tokenize("rust go rust"), vec!["rust", "go", "rust"]);
    }

    #[test]
    fn test_does_not_lowercase() {
        assert_eq!(tokenize("Python AWS"), vec!["Python", "AWS"]);
    }

    #[test]
    fn test_digits_stay_inside_tokens() {
        assert_eq!(tokenize("555-123-4567 s3"), vec!["555", "123", "4567", "s3"]);
    }

    #[test]
    fn test_underscore_is_a_separator() {
        assert_eq!(tokenize("snake_case"), vec!["snake", "case"]);
    }

    #[test]
    fn test_token_count_equals_alphanumeric_runs() {
        let text = "a1 b2--c3...d4\n\te5";
        assert_eq!(tokenize(text).len(), 5);
    }

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        assert_eq!(
            normalize_whitespace("  John   Smith\n\nEngineer\t "),
            "John Smith Engineer"
        );
        assert_eq!(normalize_whitespace("\n \t"), "");
    }
}
