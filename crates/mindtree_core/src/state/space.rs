//! The state arena: flat thought/lexeme tables plus view state.
//!
//! # Responsibility
//! - Own every thought and lexeme record behind id/key lookups.
//! - Expose the pure query surface consumed by operations, exporters,
//!   and the UI layer.
//!
//! # Invariants
//! - The root thought always exists and is never removed.
//! - `children` listing is deterministic: rank ascending, id ascending.
//! - A lexeme's contexts match exactly the thoughts whose value
//!   normalizes to its key; emptied lexemes are dropped.

use crate::error::{EngineError, EngineResult};
use crate::model::lexeme::{normalize, Lexeme};
use crate::model::path::{Path, SimplePath};
use crate::model::thought::{ChildKey, Thought, ThoughtId, Timestamp, ROOT_ID, ROOT_VALUE};
use crate::sort::preference::SortPreference;
use crate::state::alert::{Alert, AlertKind};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// In-memory arena holding the whole thought tree and its view state.
#[derive(Debug, Clone)]
pub struct ThoughtSpace {
    thoughts: HashMap<ThoughtId, Thought>,
    lexemes: HashMap<String, Lexeme>,
    /// Active cursor in view coordinates.
    pub cursor: Option<Path>,
    /// Ancestor paths currently expanded below the cursor.
    pub expanded: HashSet<Path>,
    /// Paths whose children render as parent contexts instead.
    pub context_views: HashSet<Path>,
    /// Single transient alert slot; policy violations land here.
    pub alert: Option<Alert>,
    /// Global sort preference used when a context has no `=sort`.
    pub sort_default: SortPreference,
    /// Manual rank memory keyed by context id, captured when a context
    /// turns sorted and restored when it turns back to manual order.
    pub(crate) manual_ranks: HashMap<ThoughtId, HashMap<ThoughtId, f64>>,
}

impl ThoughtSpace {
    /// Creates an arena seeded with the root thought.
    pub fn new() -> Self {
        let mut thoughts = HashMap::new();
        thoughts.insert(
            ROOT_ID,
            Thought::new(ROOT_ID, ROOT_VALUE, 0.0, None, 0, ""),
        );
        Self {
            thoughts,
            lexemes: HashMap::new(),
            cursor: None,
            expanded: HashSet::new(),
            context_views: HashSet::new(),
            alert: None,
            sort_default: SortPreference::default(),
            manual_ranks: HashMap::new(),
        }
    }

    pub fn root_id(&self) -> ThoughtId {
        ROOT_ID
    }

    pub fn thought(&self, id: ThoughtId) -> Option<&Thought> {
        self.thoughts.get(&id)
    }

    pub(crate) fn thought_mut(&mut self, id: ThoughtId) -> Option<&mut Thought> {
        self.thoughts.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root alone counts as empty.
        self.thoughts.len() <= 1
    }

    /// Resolves a path head or fails fatally; paths must always resolve.
    pub fn resolve(&self, path: &Path) -> EngineResult<&Thought> {
        self.thought(path.head())
            .ok_or_else(|| EngineError::PathUnresolved(path.to_string()))
    }

    /// All children of a thought in deterministic sibling order.
    pub fn children_ids(&self, id: ThoughtId) -> Vec<ThoughtId> {
        let Some(thought) = self.thoughts.get(&id) else {
            return Vec::new();
        };
        let mut ids: Vec<ThoughtId> = thought.children.values().copied().collect();
        ids.sort_by(|a, b| self.sibling_order(*a, *b));
        ids
    }

    /// All children of a thought, rank ascending.
    pub fn children(&self, id: ThoughtId) -> Vec<&Thought> {
        self.children_ids(id)
            .into_iter()
            .filter_map(|child| self.thoughts.get(&child))
            .collect()
    }

    /// Children with attributes and archived thoughts filtered out.
    pub fn visible_children(&self, id: ThoughtId) -> Vec<&Thought> {
        self.children(id)
            .into_iter()
            .filter(|child| !child.is_attribute() && child.archived.is_none())
            .collect()
    }

    pub fn visible_children_ids(&self, id: ThoughtId) -> Vec<ThoughtId> {
        self.visible_children(id)
            .into_iter()
            .map(|child| child.id)
            .collect()
    }

    /// First child in sibling order, attributes included.
    pub fn first_child_id(&self, id: ThoughtId) -> Option<ThoughtId> {
        self.children_ids(id).into_iter().next()
    }

    /// Visible child whose value normalizes to the same key as `value`.
    pub fn child_by_value(&self, id: ThoughtId, value: &str) -> Option<&Thought> {
        let key = normalize(value);
        self.visible_children(id)
            .into_iter()
            .find(|child| normalize(&child.value) == key)
    }

    /// Id of the attribute child with the given reserved name.
    pub fn attribute_child_id(&self, id: ThoughtId, name: &str) -> Option<ThoughtId> {
        self.thoughts
            .get(&id)?
            .children
            .get(&ChildKey::Attribute(name.to_string()))
            .copied()
    }

    /// Whether a thought carries the given attribute child.
    pub fn has_attribute(&self, id: ThoughtId, name: &str) -> bool {
        self.attribute_child_id(id, name).is_some()
    }

    /// Value of the attribute's first child, e.g. the text of `=note`.
    pub fn attribute(&self, id: ThoughtId, name: &str) -> Option<String> {
        let attribute_id = self.attribute_child_id(id, name)?;
        let first = self.first_child_id(attribute_id)?;
        self.thoughts.get(&first).map(|child| child.value.clone())
    }

    /// Lexeme entry for a display value, looked up by normalized key.
    pub fn lexeme(&self, value: &str) -> Option<&Lexeme> {
        self.lexemes.get(&normalize(value))
    }

    /// Every thought id whose value normalizes like `value`.
    pub fn contexts_of(&self, value: &str) -> Vec<ThoughtId> {
        self.lexeme(value)
            .map(|lexeme| lexeme.contexts.clone())
            .unwrap_or_default()
    }

    /// Rebuilds the unambiguous path to a thought via parent pointers.
    pub fn path_to(&self, id: ThoughtId) -> Option<SimplePath> {
        if id == ROOT_ID {
            return Some(SimplePath::root());
        }
        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = id;
        loop {
            if !seen.insert(cursor) {
                return None;
            }
            let thought = self.thoughts.get(&cursor)?;
            ids.push(cursor);
            match thought.parent_id {
                Some(parent) if parent == ROOT_ID => break,
                Some(parent) => cursor = parent,
                None => return None,
            }
        }
        ids.reverse();
        Some(SimplePath::new(ids))
    }

    /// Preorder subtree ids, starting with `id` itself.
    pub fn subtree_ids(&self, id: ThoughtId) -> Vec<ThoughtId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.thoughts.contains_key(&current) {
                out.push(current);
                let mut children = self.children_ids(current);
                children.reverse();
                stack.extend(children);
            }
        }
        out
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: ThoughtId, id: ThoughtId) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = self.thoughts.get(&id).and_then(|t| t.parent_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current) {
                return false;
            }
            cursor = self.thoughts.get(&current).and_then(|t| t.parent_id);
        }
        false
    }

    /// Whether a thought sits inside a reserved `=archive` container.
    pub fn is_inside_archive(&self, id: ThoughtId) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !seen.insert(current) {
                return false;
            }
            let Some(thought) = self.thoughts.get(&current) else {
                return false;
            };
            if thought.value == "=archive" {
                return true;
            }
            cursor = thought.parent_id;
        }
        false
    }

    /// Replaces the transient alert slot.
    pub fn set_alert(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.alert = Some(Alert::new(kind, message));
    }

    /// Consumes the transient alert, if any.
    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    /// Flags a thought as partially hydrated. Exposed for the external
    /// sync collaborator; pending thoughts defer merges.
    pub fn mark_pending(&mut self, id: ThoughtId, pending: bool) {
        if let Some(thought) = self.thoughts.get_mut(&id) {
            thought.pending = pending;
        }
    }

    /// Recomputes the expanded set as every proper prefix of the cursor
    /// plus the cursor itself.
    pub fn recompute_expanded(&mut self) {
        self.expanded.clear();
        let Some(cursor) = self.cursor.clone() else {
            return;
        };
        let ids = cursor.ids();
        for depth in 1..=ids.len() {
            self.expanded.insert(Path::new(ids[..depth].to_vec()));
        }
    }

    fn sibling_order(&self, a: ThoughtId, b: ThoughtId) -> Ordering {
        let rank_a = self.thoughts.get(&a).map(|t| t.rank).unwrap_or(0.0);
        let rank_b = self.thoughts.get(&b).map(|t| t.rank).unwrap_or(0.0);
        rank_a
            .partial_cmp(&rank_b)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    }

    // ---- crate-internal mutators used by the operation modules ----

    /// Inserts a thought, links it under its parent, and indexes its
    /// value. The caller guarantees the parent exists.
    pub(crate) fn add_thought(&mut self, thought: Thought) {
        let id = thought.id;
        let key = thought.child_key();
        let parent = thought.parent_id;
        let now = thought.last_updated;
        let value = thought.value.clone();
        self.thoughts.insert(id, thought);
        if let Some(parent_id) = parent {
            if let Some(parent) = self.thoughts.get_mut(&parent_id) {
                parent.children.insert(key, id);
            }
        }
        self.lexeme_add(&value, id, now);
    }

    /// Removes a thought record only; links and lexeme entries are the
    /// caller's responsibility.
    pub(crate) fn remove_thought(&mut self, id: ThoughtId) -> Option<Thought> {
        if id == ROOT_ID {
            return None;
        }
        self.thoughts.remove(&id)
    }

    pub(crate) fn add_child_link(&mut self, parent_id: ThoughtId, key: ChildKey, id: ThoughtId) {
        if let Some(parent) = self.thoughts.get_mut(&parent_id) {
            parent.children.insert(key, id);
        }
    }

    pub(crate) fn remove_child_link(&mut self, parent_id: ThoughtId, id: ThoughtId) {
        if let Some(parent) = self.thoughts.get_mut(&parent_id) {
            parent.children.retain(|_, child| *child != id);
        }
    }

    pub(crate) fn lexeme_add(&mut self, value: &str, id: ThoughtId, now: Timestamp) {
        if value == ROOT_VALUE {
            return;
        }
        let lexeme = self
            .lexemes
            .entry(normalize(value))
            .or_insert_with(|| Lexeme::new(now));
        if !lexeme.contexts.contains(&id) {
            lexeme.contexts.push(id);
        }
        lexeme.last_updated = now;
    }

    pub(crate) fn lexeme_remove(&mut self, value: &str, id: ThoughtId) {
        let key = normalize(value);
        if let Some(lexeme) = self.lexemes.get_mut(&key) {
            lexeme.contexts.retain(|context| *context != id);
            if lexeme.contexts.is_empty() {
                self.lexemes.remove(&key);
            }
        }
    }
}

impl Default for ThoughtSpace {
    fn default() -> Self {
        Self::new()
    }
}
