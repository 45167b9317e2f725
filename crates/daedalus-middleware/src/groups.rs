//! Named, reusable middleware lists.

use crate::factory::MiddlewareFactory;
use crate::stack::BoxedMiddleware;
use daedalus_core::ServiceResult;
use indexmap::IndexMap;
use std::fmt;

/// Registry of middleware groups, built once at startup.
///
/// A group named after an API namespace (for example `new-api/2.0`) is
/// applied to every route of that namespace unless the route opts out.
///
/// Merging groups concatenates their lists in the requested order. The
/// same middleware listed in two merged groups runs twice.
#[derive(Clone, Default)]
pub struct MiddlewareGroups {
    groups: IndexMap<String, Vec<BoxedMiddleware>>,
}

impl MiddlewareGroups {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from `groupName → [serviceIdentifier]` definitions.
    ///
    /// # Errors
    ///
    /// Fails on the first identifier that does not resolve to a middleware.
    pub fn build<'d, I, S>(factory: &MiddlewareFactory, definitions: I) -> ServiceResult<Self>
    where
        I: IntoIterator<Item = (&'d String, &'d Vec<S>)>,
        S: AsRef<str> + 'd,
    {
        let mut groups = Self::new();
        for (name, identifiers) in definitions {
            let middlewares = factory.create_from_identifiers(identifiers)?;
            tracing::trace!(group = %name, count = middlewares.len(), "middleware group built");
            groups.insert(name.clone(), middlewares);
        }
        Ok(groups)
    }

    /// Sets the middleware of a group, replacing any previous list.
    pub fn insert(&mut self, name: impl Into<String>, middlewares: Vec<BoxedMiddleware>) {
        self.groups.insert(name.into(), middlewares);
    }

    /// Returns the middleware of one group. Unknown groups have none.
    #[must_use]
    pub fn get_middlewares(&self, name: &str) -> Vec<BoxedMiddleware> {
        self.groups.get(name).cloned().unwrap_or_default()
    }

    /// Returns the concatenated middleware of several groups, in the given order.
    #[must_use]
    pub fn get_middlewares_for_groups<S>(&self, names: &[S]) -> Vec<BoxedMiddleware>
    where
        S: AsRef<str>,
    {
        if names.is_empty() {
            return Vec::new();
        }
        names
            .iter()
            .flat_map(|name| self.get_middlewares(name.as_ref()))
            .collect()
    }

    /// Checks whether a group is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Returns the group names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if no group is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Debug for MiddlewareGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, middlewares) in &self.groups {
            let names: Vec<&str> = middlewares.iter().map(|mw| mw.name()).collect();
            map.entry(name, &names);
        }
        map.finish()
    }
}
