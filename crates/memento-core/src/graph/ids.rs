//! Identifier newtypes and the sequential ID scheme.
//!
//! Mementos are numbered `m1, m2, …`; entities are numbered `e1_<slug>,
//! e2_<slug>, …` where the slug is derived from the entity type. Numbers are
//! handed out by the store and never reused.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a memento (`m<N>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MementoId(String);

/// Identifier of an entity (`e<N>_<type-slug>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl MementoId {
    /// The ID assigned to the `sequence`-th memento (1-based)
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("m{}", sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EntityId {
    /// The ID assigned to the `sequence`-th entity (1-based) of `entity_type`
    pub fn from_sequence(sequence: u64, entity_type: &str) -> Self {
        Self(format!("e{}_{}", sequence, slugify(entity_type)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_id_impls {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&$ty> for $ty {
            fn from(value: &$ty) -> Self {
                value.clone()
            }
        }
    };
}

string_id_impls!(MementoId);
string_id_impls!(EntityId);

/// Lowercase a type tag and collapse every run of non-alphanumeric
/// characters into a single underscore.
///
/// `"Design Principle"` becomes `"design_principle"`. The result is always a
/// valid identifier tail for the diagram and Cypher renderers.
pub fn slugify(tag: &str) -> String {
    let mut slug = String::with_capacity(tag.len());
    let mut pending_separator = false;
    for c in tag.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("entity");
    }
    slug
}
