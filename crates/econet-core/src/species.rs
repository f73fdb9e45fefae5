//! Canonical species identifiers.
//!
//! Names arrive from several places (the park roster, the interaction API,
//! the taxonomy API, the command line) with inconsistent casing and stray
//! trailing punctuation. Every name is passed through [`normalize`] before
//! it is compared or used as a graph key.

/// Canonicalize a species name.
///
/// Lowercases the input and strips trailing `.` and `-` characters. Internal
/// punctuation is preserved, and nothing else is trimmed.
///
/// ```
/// use econet_core::species::normalize;
///
/// assert_eq!(normalize("Canis Lupus."), "canis lupus");
/// assert_eq!(normalize("Ursus americanus-"), "ursus americanus");
/// assert_eq!(normalize("x.y-z"), "x.y-z");
/// ```
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .trim_end_matches(['.', '-'])
        .to_string()
}

/// Returns true if two raw names refer to the same canonical species.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Normalize a list of names, dropping empty results and repeats.
///
/// Order of first occurrence is preserved.
pub fn normalize_all<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .map(|n| normalize(n.as_ref()))
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.clone()))
        .collect()
}
