//! Key normalization utilities.
//!
//! Note fields (`Build Date`, `Praxis commit`) and section titles are written
//! by hand across releases, so matching is done on a normalized form:
//! lowercase, underscores treated as spaces, whitespace collapsed.

/// Normalize a key for case- and spacing-insensitive comparison.
///
/// # Examples
///
/// ```
/// use relnotes_core::util::keys::normalize_key;
///
/// assert_eq!(normalize_key("Build Date"), "build date");
/// assert_eq!(normalize_key("  Praxis   commit "), "praxis commit");
/// assert_eq!(normalize_key("BUILD_DATE"), "build date");
/// ```
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Returns `true` if `key` matches any of `candidates` after normalization.
///
/// # Examples
///
/// ```
/// use relnotes_core::util::keys::key_matches;
///
/// let keys = vec!["Praxis commit".to_string(), "Commit".to_string()];
/// assert!(key_matches("commit", &keys));
/// assert!(!key_matches("Paxml commit", &keys));
/// ```
pub fn key_matches<S: AsRef<str>>(key: &str, candidates: &[S]) -> bool {
    let key = normalize_key(key);
    candidates
        .iter()
        .any(|candidate| normalize_key(candidate.as_ref()) == key)
}

/// Convert a key into an environment-variable style identifier.
///
/// # Examples
///
/// ```
/// use relnotes_core::util::keys::env_key;
///
/// assert_eq!(env_key("parse.date_format"), "PARSE_DATE_FORMAT");
/// assert_eq!(env_key("Build Date"), "BUILD_DATE");
/// ```
pub fn env_key(key: &str) -> String {
    key.trim().to_uppercase().replace(['-', ' ', '.'], "_")
}
