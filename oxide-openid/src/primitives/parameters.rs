//! Ordered string maps for raw request parameters and response parameters.
use std::iter::FromIterator;

use serde::{Deserialize, Serialize};

/// An insertion ordered map of parameter names to values.
///
/// Inserting a key a second time replaces the value but keeps the position of the first
/// insertion, so a form with a repeated key collapses to its last value. Iteration order is fully
/// determined by the order of insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pairs: Vec<(String, String)>,
}

impl Parameters {
    /// An empty parameter map.
    pub fn new() -> Self {
        Parameters::default()
    }

    /// Insert a value, replacing and returning a previous value of the same key.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.pairs.push((key, value));
                None
            }
        }
    }

    /// Look up the value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// If the key is present, possibly with an empty value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// If there are no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over all pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// A copy retaining only the allowed keys, in their original order.
    ///
    /// Used before persisting parameters so that nothing but the explicitly listed keys outlives
    /// the request.
    pub fn sanitize(&self, allowed: &[&str]) -> Parameters {
        self.pairs
            .iter()
            .filter(|(k, _)| allowed.contains(&k.as_str()))
            .cloned()
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Parameters::new();
        for (key, value) in iter {
            parameters.insert(key, value);
        }
        parameters
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Parameters {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
