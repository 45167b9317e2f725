//! Near-miss detection for route entry keys.
//!
//! A key one edit away from a known key is almost certainly a slip
//! (`midlewares`, `nme`). Keys two or more edits away are left alone, so
//! entries can carry custom keys of their own.

use crate::definition::ROUTE_DEFINITION_KEYS;
use crate::error::{RegistrationError, RegistrationResult};

/// Edit distance (insertions, deletions, substitutions) between two strings.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Returns the known key `key` is a near miss of, if any.
#[must_use]
pub fn suggest(key: &str) -> Option<&'static str> {
    if ROUTE_DEFINITION_KEYS.contains(&key) {
        return None;
    }
    ROUTE_DEFINITION_KEYS
        .iter()
        .copied()
        .find(|known| levenshtein(key, known) == 1)
}

/// Fails on the first key of `keys` that is a near miss of a known key.
///
/// `path` is the namespace, pattern and method of the entry; the offending
/// key is appended to it in the error.
///
/// # Errors
///
/// Returns [`RegistrationError::ConfigurationTypo`].
pub fn detect_typos<'k, I>(path: &[&str], keys: I) -> RegistrationResult<()>
where
    I: IntoIterator<Item = &'k str>,
{
    for key in keys {
        if let Some(known) = suggest(key) {
            let mut full_path: Vec<String> = path.iter().map(ToString::to_string).collect();
            full_path.push(key.to_string());
            tracing::warn!(path = %full_path.join(" › "), suggestion = known, "route definition typo");
            return Err(RegistrationError::typo(full_path, known));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("name", ""), 4);
        assert_eq!(levenshtein("midlewares", "middlewares"), 1);
        assert_eq!(levenshtein("middleware", "middlewares"), 1);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_exact_keys_pass() {
        assert!(detect_typos(&["a", "b", "GET"], ROUTE_DEFINITION_KEYS.iter().copied()).is_ok());
    }

    #[test]
    fn test_distance_one_fails() {
        let err = detect_typos(&["new-api/2.0", "channels", "GET"], ["service", "midlewares"])
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::typo(
                vec![
                    "new-api/2.0".to_string(),
                    "channels".to_string(),
                    "GET".to_string(),
                    "midlewares".to_string()
                ],
                "middlewares"
            )
        );
    }

    #[test]
    fn test_distance_two_or_more_passes() {
        assert!(detect_typos(&[], ["servce_", "description", "cacheTtl"]).is_ok());
        assert_eq!(suggest("nam"), Some("name"));
        assert_eq!(suggest("nm"), None);
    }

    proptest! {
        #[test]
        fn prop_single_deletion_is_a_typo(index in 0usize..5, position in 0usize..64) {
            let known = ROUTE_DEFINITION_KEYS[index];
            let position = position % known.len();
            let mut key: String = known.to_string();
            key.remove(position);

            // a deletion may land on another known key only if one key is
            // a prefix of another one letter longer, which none is
            prop_assert!(!ROUTE_DEFINITION_KEYS.contains(&key.as_str()));
            prop_assert!(suggest(&key).is_some());
        }

        #[test]
        fn prop_levenshtein_symmetric(a in "[a-zA-Z]{0,12}", b in "[a-zA-Z]{0,12}") {
            prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
        }

        #[test]
        fn prop_far_keys_pass(key in "[xyz]{3,8}") {
            prop_assert!(detect_typos(&[], [key.as_str()]).is_ok());
        }
    }
}
