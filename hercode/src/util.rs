//! Shared utility functions
//!
//! Typo suggestions for undefined names.

/// Edit distance between two names, counted in characters.
/// Keeps a single row of the distance table.
fn edit_distance(a: &str, b: &str) -> usize {
    let target: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in target.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[target.len()]
}

/// Suggest a visible name for a misspelled one.
/// Short names tolerate a single edit, longer ones two. Ties go to the
/// candidate seen first.
pub fn suggest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let threshold = if name.chars().count() <= 4 { 1 } else { 2 };
    candidates
        .into_iter()
        .filter(|candidate| *candidate != name)
        .map(|candidate| (edit_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Format a "did you mean" suggestion hint for an unknown name.
pub fn format_suggestion_hint(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean `{name}`?)"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance_counts_characters() {
        assert_eq!(edit_distance("total", "totl"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("héllo", "hello"), 1);
    }

    #[test]
    fn test_suggest_scales_threshold() {
        assert_eq!(suggest("cont", ["count", "total"]), Some("count"));
        assert_eq!(suggest("x", ["xs"]), Some("xs"));
        assert_eq!(suggest("ab", ["xyz"]), None);
        assert_eq!(suggest("totl", ["total"]), Some("total"));
        assert_eq!(suggest("lenght", ["length"]), Some("length"));
    }

    #[test]
    fn test_suggest_prefers_closest_then_first() {
        assert_eq!(suggest("countr", ["counter", "count"]), Some("counter"));
        assert_eq!(suggest("bat", ["cat", "hat"]), Some("cat"));
    }

    #[test]
    fn test_suggest_skips_identical_name() {
        assert_eq!(suggest("sum", ["sum"]), None);
    }

    #[test]
    fn test_format_suggestion_hint() {
        assert_eq!(format_suggestion_hint(Some("hello")), " (did you mean `hello`?)");
        assert_eq!(format_suggestion_hint(None), "");
    }
}
