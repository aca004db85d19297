//! In-memory namespace.

use crate::core::Value;
use crate::error::Result;
use crate::namespace::Namespace;
use std::collections::HashMap;

/// `HashMap`-backed namespace. Holds any value, including opaque host
/// objects.
///
/// # Examples
///
/// ```
/// use replclip::namespace::{MemoryNamespace, Namespace};
///
/// let mut ns = MemoryNamespace::new();
/// ns.set("x", 42i64.into()).unwrap();
/// assert_eq!(ns.get("x").unwrap(), Some(42i64.into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryNamespace {
    variables: HashMap<String, Value>,
}

impl MemoryNamespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MemoryNamespace {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Namespace for MemoryNamespace {
    fn get(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.variables.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<bool> {
        Ok(self.variables.remove(name).is_some())
    }

    fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.variables.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
