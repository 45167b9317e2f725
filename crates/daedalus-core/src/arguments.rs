//! Route arguments captured from the matched path.
//!
//! The router stores a [`RouteArguments`] value in the request extensions
//! before the route's middleware stack runs.

use smallvec::SmallVec;

/// Maximum number of arguments stored inline (stack allocated).
const INLINE_ARGUMENTS: usize = 4;

/// Named values extracted from a matched route pattern.
///
/// # Example
///
/// ```rust
/// use daedalus_core::RouteArguments;
///
/// let mut arguments = RouteArguments::new();
/// arguments.push("channelId", "fb_1234");
///
/// assert_eq!(arguments.get("channelId"), Some("fb_1234"));
/// assert_eq!(arguments.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteArguments {
    inner: SmallVec<[(String, String); INLINE_ARGUMENTS]>,
}

impl RouteArguments {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value of an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over `(name, value)` pairs in match order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RouteArguments {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_new() {
        let arguments = RouteArguments::new();
        assert!(arguments.is_empty());
        assert_eq!(arguments.len(), 0);
    }

    #[test]
    fn test_arguments_from_iter_preserves_order() {
        let arguments: RouteArguments = [("brandId", "1000"), ("channelId", "xyz")]
            .into_iter()
            .collect();

        let names: Vec<&str> = arguments.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["brandId", "channelId"]);
        assert_eq!(arguments.get("brandId"), Some("1000"));
    }
}
