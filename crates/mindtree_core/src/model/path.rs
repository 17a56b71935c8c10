//! Path addressing for the thought tree.
//!
//! # Responsibility
//! - Address thoughts by the id walk from the root through the active
//!   view, including walks that cross a context view.
//! - Distinguish unambiguous walks (`SimplePath`) that are safe for
//!   rank arithmetic.
//!
//! # Invariants
//! - An empty id sequence addresses the root itself.
//! - A `SimplePath` never crosses a context-view boundary; every
//!   segment's recorded parent is the preceding segment.

use crate::model::thought::{ThoughtId, ROOT_ID};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Ordered id walk from the root through the active view.
///
/// A path may cross a context view: a segment whose recorded parent is
/// a different context of the preceding segment's value. Use the
/// context-view resolver to obtain a [`SimplePath`] before any rank
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path(Vec<ThoughtId>);

impl Path {
    /// Path addressing the root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(ids: Vec<ThoughtId>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[ThoughtId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Id of the addressed thought; the root id for the root path.
    pub fn head(&self) -> ThoughtId {
        self.0.last().copied().unwrap_or(ROOT_ID)
    }

    /// Path of the addressed thought's parent in view coordinates.
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            return None;
        }
        Some(Path(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Extends the walk by one child id.
    pub fn append(&self, id: ThoughtId) -> Path {
        let mut ids = self.0.clone();
        ids.push(id);
        Path(ids)
    }

    /// Returns whether `prefix` is a leading segment of this path.
    pub fn starts_with(&self, prefix: &[ThoughtId]) -> bool {
        self.0.len() >= prefix.len() && self.0[..prefix.len()] == *prefix
    }

    /// Returns whether the walk visits the given id anywhere.
    pub fn contains(&self, id: ThoughtId) -> bool {
        self.0.contains(&id)
    }

    /// Rewrites a leading segment, preserving the remainder of the walk.
    ///
    /// Returns `None` when `from` is not a prefix of this path.
    pub fn rebase(&self, from: &[ThoughtId], to: &[ThoughtId]) -> Option<Path> {
        if !self.starts_with(from) {
            return None;
        }
        let mut ids = to.to_vec();
        ids.extend_from_slice(&self.0[from.len()..]);
        Some(Path(ids))
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "{ROOT_ID}");
        }
        let joined = self
            .0
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("/");
        write!(f, "{joined}")
    }
}

impl From<SimplePath> for Path {
    fn from(value: SimplePath) -> Self {
        Path(value.0)
    }
}

/// A path statically known not to cross a context-view boundary.
///
/// Produced by the creating operation itself or by the context-view
/// resolver; only simple paths are legal inputs to rank arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimplePath(Vec<ThoughtId>);

impl SimplePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(ids: Vec<ThoughtId>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[ThoughtId] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn head(&self) -> ThoughtId {
        self.0.last().copied().unwrap_or(ROOT_ID)
    }

    /// Id of the addressed thought's parent.
    pub fn parent_id(&self) -> ThoughtId {
        if self.0.len() < 2 {
            ROOT_ID
        } else {
            self.0[self.0.len() - 2]
        }
    }

    pub fn parent(&self) -> Option<SimplePath> {
        if self.0.is_empty() {
            return None;
        }
        Some(SimplePath(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn append(&self, id: ThoughtId) -> SimplePath {
        let mut ids = self.0.clone();
        ids.push(id);
        SimplePath(ids)
    }

    pub fn as_path(&self) -> Path {
        Path(self.0.clone())
    }
}

impl Display for SimplePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::{Path, SimplePath};
    use crate::model::thought::ROOT_ID;
    use uuid::Uuid;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn root_path_heads_at_root_id() {
        assert_eq!(Path::root().head(), ROOT_ID);
        assert!(Path::root().parent().is_none());
        assert_eq!(SimplePath::root().parent_id(), ROOT_ID);
    }

    #[test]
    fn append_and_parent_are_inverses() {
        let path = Path::root().append(id(1)).append(id(2));
        assert_eq!(path.head(), id(2));
        assert_eq!(path.parent().expect("has parent").head(), id(1));
    }

    #[test]
    fn rebase_rewrites_prefix_only() {
        let path = Path::new(vec![id(1), id(2), id(3)]);
        let rebased = path
            .rebase(&[id(1), id(2)], &[id(9)])
            .expect("prefix matches");
        assert_eq!(rebased.ids(), &[id(9), id(3)]);
        assert!(path.rebase(&[id(5)], &[id(9)]).is_none());
    }
}
