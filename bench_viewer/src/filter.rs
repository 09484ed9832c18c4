use anyhow::{Context, Result};
use regex::Regex;

/// Compile test name filter patterns
pub fn compile_filters(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).with_context(|| format!("Invalid test filter '{}'", pattern))
        })
        .collect()
}

/// True if `test_name` matches any filter, or if there are no filters
pub fn matches_any_filter(test_name: &str, filters: &[Regex]) -> bool {
    filters.is_empty() || filters.iter().any(|re| re.is_match(test_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_names_pattern() {
        let error = compile_filters(&["Vbap(".to_string()]).unwrap_err();
        assert!(error.to_string().contains("Vbap("));
    }

    #[test]
    fn test_no_filters_match_everything() {
        assert!(matches_any_filter("Hrtf spat algorithm", &[]));
    }

    #[test]
    fn test_any_filter_matches() {
        let filters = compile_filters(&["^Hrtf".to_string(), "Stereo$".to_string()]).unwrap();
        assert!(matches_any_filter("Hrtf spat algorithm", &filters));
        assert!(matches_any_filter("Mbap to Stereo", &filters));
        assert!(!matches_any_filter("Vbap spat algorithm", &filters));
    }

    #[test]
    fn test_filters_are_case_sensitive() {
        let filters = compile_filters(&["hrtf".to_string()]).unwrap();
        assert!(!matches_any_filter("Hrtf", &filters));

        let filters = compile_filters(&["(?i)hrtf".to_string()]).unwrap();
        assert!(matches_any_filter("Hrtf", &filters));
    }
}
