//! Thought domain model.
//!
//! # Responsibility
//! - Define the tree node record and its child membership keying.
//! - Provide lifecycle helpers for timestamps and archival state.
//!
//! # Invariants
//! - `id` is stable and never reused for another thought.
//! - Every non-root thought has a `parent_id` whose children map
//!   contains it.
//! - Attribute children (value starting with `=`) are keyed by their
//!   attribute name, enforcing at most one per name per parent.
//! - `rank` establishes order among siblings only; its absolute value
//!   carries no meaning.

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every thought in the tree.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ThoughtId = Uuid;

/// Unix epoch milliseconds.
pub type Timestamp = i64;

/// The fixed id of the root thought. Always present, never deleted.
pub const ROOT_ID: ThoughtId = Uuid::nil();

/// Reserved value of the root thought. Not indexed by any lexeme.
pub const ROOT_VALUE: &str = "__ROOT__";

/// Returns whether a value names a metaprogramming attribute.
///
/// Attributes are ordinary thoughts whose value starts with `=`; they
/// are filtered from visible children by default.
pub fn is_attribute_value(value: &str) -> bool {
    value.starts_with('=')
}

/// Membership key inside a parent's children map.
///
/// Ordinary children are keyed by their own id. Attribute children are
/// keyed by the attribute name, so a second child with the same reserved
/// name cannot exist under one parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChildKey {
    /// Ordinary child, keyed by the child's id.
    Id(ThoughtId),
    /// Attribute child, keyed by its `=`-prefixed value.
    Attribute(String),
}

impl ChildKey {
    /// Computes the membership key for a child with the given value.
    pub fn for_value(value: &str, id: ThoughtId) -> Self {
        if is_attribute_value(value) {
            Self::Attribute(value.to_string())
        } else {
            Self::Id(id)
        }
    }
}

impl Display for ChildKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Attribute(name) => write!(f, "{name}"),
        }
    }
}

// Children maps serialize with plain string keys: attribute names are
// written verbatim, ordinary keys as the uuid text form. The `=` prefix
// disambiguates on the way back in.
impl Serialize for ChildKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChildKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = ChildKey;

            fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("a uuid or `=`-prefixed attribute name")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ChildKey, E> {
                if is_attribute_value(value) {
                    return Ok(ChildKey::Attribute(value.to_string()));
                }
                Uuid::parse_str(value)
                    .map(ChildKey::Id)
                    .map_err(|_| E::custom(format!("invalid child key `{value}`")))
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

/// Canonical tree node record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    /// Stable global id used for paths, lexeme contexts, and cursors.
    pub id: ThoughtId,
    /// Literal display value. Lexeme lookup uses the normalized form.
    pub value: String,
    /// Sortable key, locally meaningful among siblings only.
    pub rank: f64,
    /// Exclusive ownership pointer. `None` only for the root.
    pub parent_id: Option<ThoughtId>,
    /// Child membership map; see `ChildKey` for the keying rule.
    pub children: HashMap<ChildKey, ThoughtId>,
    /// Epoch ms creation timestamp.
    pub created: Timestamp,
    /// Epoch ms of the last mutation touching this thought.
    pub last_updated: Timestamp,
    /// Session/client identifier of the last writer.
    pub updated_by: String,
    /// Set when the thought lives inside an `=archive` container.
    pub archived: Option<Timestamp>,
    /// Partially hydrated record delivered by the sync collaborator.
    /// A pending thought defers merges so unloaded data is not dropped.
    pub pending: bool,
}

impl Thought {
    /// Creates a thought with empty children and no archive stamp.
    pub fn new(
        id: ThoughtId,
        value: impl Into<String>,
        rank: f64,
        parent_id: Option<ThoughtId>,
        created: Timestamp,
        updated_by: impl Into<String>,
    ) -> Self {
        Self {
            id,
            value: value.into(),
            rank,
            parent_id,
            children: HashMap::new(),
            created,
            last_updated: created,
            updated_by: updated_by.into(),
            archived: None,
            pending: false,
        }
    }

    /// Returns whether this thought is a metaprogramming attribute.
    pub fn is_attribute(&self) -> bool {
        is_attribute_value(&self.value)
    }

    /// Membership key of this thought inside its parent's children map.
    pub fn child_key(&self) -> ChildKey {
        ChildKey::for_value(&self.value, self.id)
    }

    /// Stamps the last-writer fields.
    pub fn touch(&mut self, now: Timestamp, updated_by: &str) {
        self.last_updated = now;
        self.updated_by = updated_by.to_string();
    }
}
