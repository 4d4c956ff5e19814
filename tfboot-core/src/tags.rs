//! Tags - Deriving resource tags from a scope

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

/// Tag category used for the state bucket
pub const BACKEND_TAG_CATEGORY: &str = "backend";

/// Errors that can occur when parsing tags
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    /// The argument had no `=` separator
    #[error("Invalid tag '{0}': expected KEY=VALUE")]
    MissingSeparator(String),

    /// The key part was empty
    #[error("Invalid tag '{0}': key must not be empty")]
    EmptyKey(String),
}

/// A single key/value tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Ordered set of tags, unique by key and sorted by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: BTreeMap<String, String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, replacing any existing value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Merge another tag set into this one; `other` wins on conflicts
    pub fn extend(&mut self, other: &TagSet) {
        for (key, value) in &other.tags {
            self.tags.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate tags in key order
    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tags.iter().map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
    }

    /// Parse a `KEY=VALUE` argument into a key/value pair
    ///
    /// The value may itself contain `=`; only the first one separates.
    pub fn parse_pair(arg: &str) -> Result<(String, String), TagError> {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| TagError::MissingSeparator(arg.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(TagError::EmptyKey(arg.to_string()));
        }
        Ok((key.to_string(), value.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// Something that can produce the tags for a category of resources
pub trait TagSource {
    /// Tags to apply to resources of the given category (e.g., "backend")
    fn tags(&self, category: &str) -> TagSet;
}

/// Named tagging context: common tags plus per-category overrides
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub name: String,
    common: TagSet,
    categories: HashMap<String, TagSet>,
}

impl Scope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a tag applied to every category
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common.insert(key, value);
        self
    }

    /// Add a tag applied only to one category
    pub fn with_category_tag(
        mut self,
        category: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(key, value);
        self
    }
}

impl TagSource for Scope {
    fn tags(&self, category: &str) -> TagSet {
        let mut tags = self.common.clone();
        if let Some(category_tags) = self.categories.get(category) {
            tags.extend(category_tags);
        }
        tags
    }
}
