//! Ordered, name-keyed attribute containers.
//!
//! Every container here is a `Vec` under the hood, never a `HashMap`: the
//! dataflow propagator compares the previous and new output sequences
//! positionally (see the kernel), so insertion order has to be preserved
//! and stable for the lifetime of a block. Lookup is linear, which is fine
//! at the attribute counts real blocks have (single digits to low tens).

use fb_value::{Link, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attributes that share a name can live in one of these containers.
pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigAttr {
    pub name: String,
    pub value: Value,
}

impl ConfigAttr {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Named for ConfigAttr {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAttr {
    pub name: String,
    pub value: Value,
    pub link: Option<Link>,
}

impl InputAttr {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            link: None,
        }
    }

    pub fn linked(name: impl Into<String>, link: Link) -> Self {
        Self {
            name: name.into(),
            value: Value::Empty,
            link: Some(link),
        }
    }
}

impl Named for InputAttr {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputAttr {
    pub name: String,
    pub value: Value,
    /// Names of blocks whose inputs are linked from this output. A set, not
    /// a sequence: dispatch order across distinct targets is not specified.
    pub connections: BTreeSet<String>,
}

impl OutputAttr {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            connections: BTreeSet::new(),
        }
    }
}

impl Named for OutputAttr {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateAttr {
    pub name: String,
    pub value: Value,
}

impl PrivateAttr {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Named for PrivateAttr {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An ordered, name-unique sequence of attributes of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrList<T>(Vec<T>);

impl<T: Named> AttrList<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self(items)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|a| a.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.0.iter().find(|a| a.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.0.iter_mut().find(|a| a.name() == name)
    }

    /// Appends a new attribute. Fails if an attribute of that name already
    /// exists, matching the spec's `add` contract.
    pub fn add(&mut self, attr: T) -> Result<(), AttrError> {
        if self.get(attr.name()).is_some() {
            return Err(AttrError::AlreadyExists(attr.name().to_string()));
        }
        self.0.push(attr);
        Ok(())
    }

    /// Merges `overrides` onto `defaults`: defaults keep their position,
    /// overrides win on shared names, and names novel to `overrides` are
    /// appended after all the defaults, in the order they were given.
    pub fn merge(defaults: AttrList<T>, overrides: AttrList<T>) -> AttrList<T>
    where
        T: Clone,
    {
        let mut merged = defaults;
        let mut novel = Vec::new();
        for over in overrides.0.into_iter() {
            if let Some(slot) = merged.get_mut(over.name()) {
                *slot = over;
            } else {
                novel.push(over);
            }
        }
        merged.0.extend(novel);
        merged
    }
}

impl<T: Named> Default for AttrList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttrError {
    #[error("attribute `{0}` already exists")]
    AlreadyExists(String),
    #[error("attribute `{0}` not found")]
    NotFound(String),
}

pub type ConfigAttrs = AttrList<ConfigAttr>;
pub type InputAttrs = AttrList<InputAttr>;
pub type OutputAttrs = AttrList<OutputAttr>;
pub type PrivateAttrs = AttrList<PrivateAttr>;

impl ConfigAttrs {
    /// Sets the value of an existing config attribute.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), AttrError> {
        self.get_mut(name)
            .map(|a| a.value = value)
            .ok_or_else(|| AttrError::NotFound(name.to_string()))
    }
}

impl InputAttrs {
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), AttrError> {
        self.get_mut(name)
            .map(|a| a.value = value)
            .ok_or_else(|| AttrError::NotFound(name.to_string()))
    }
}

impl OutputAttrs {
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), AttrError> {
        self.get_mut(name)
            .map(|a| a.value = value)
            .ok_or_else(|| AttrError::NotFound(name.to_string()))
    }
}

impl PrivateAttrs {
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), AttrError> {
        self.get_mut(name)
            .map(|a| a.value = value)
            .ok_or_else(|| AttrError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn cfg(name: &str, v: i64) -> ConfigAttr {
        ConfigAttr::new(name, Value::Int(v))
    }

    #[test]
    fn merge_keeps_default_order_and_appends_novel_overrides() {
        let defaults = ConfigAttrs::from_vec(vec![cfg("a", 1), cfg("b", 2)]);
        let overrides = ConfigAttrs::from_vec(vec![cfg("b", 20), cfg("c", 3)]);
        let merged = ConfigAttrs::merge(defaults, overrides);
        assert_eq!(merged.names(), vec!["a", "b", "c"]);
        assert_eq!(merged.get("b").unwrap().value, Value::Int(20));
    }

    #[test]
    fn add_rejects_duplicate_names() {
        let mut attrs = ConfigAttrs::from_vec(vec![cfg("a", 1)]);
        let err = attrs.add(cfg("a", 2)).unwrap_err();
        assert_eq!(err, AttrError::AlreadyExists("a".to_string()));
    }

    #[rstest]
    #[case("a", true)]
    #[case("missing", false)]
    fn get_finds_by_name(#[case] name: &str, #[case] found: bool) {
        let attrs = ConfigAttrs::from_vec(vec![cfg("a", 1)]);
        assert_eq!(attrs.get(name).is_some(), found);
    }

    #[test]
    fn ordering_is_stable_across_set_calls() {
        let mut attrs = ConfigAttrs::from_vec(vec![cfg("a", 1), cfg("b", 2), cfg("c", 3)]);
        attrs.set("b", Value::Int(99)).unwrap();
        assert_eq!(attrs.names(), vec!["a", "b", "c"]);
    }
}
