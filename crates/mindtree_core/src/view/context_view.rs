//! Context view toggling and path translation.
//!
//! # Responsibility
//! - Mark and unmark context views, which display every context of a
//!   thought's Lexeme beneath it.
//! - Detect view paths (a segment whose stored parent is not the
//!   preceding segment) and rebuild the real path from parent pointers.

use crate::error::{EngineError, EngineResult};
use crate::model::path::{Path, SimplePath};
use crate::model::thought::ROOT_ID;
use crate::state::alert::AlertKind;
use crate::state::space::ThoughtSpace;
use log::debug;

/// Marks or unmarks the thought at `path` as a context view root.
///
/// A value with fewer than two contexts has nothing to show; the toggle
/// raises the no-contexts alert and leaves the view set unchanged.
pub fn toggle_context_view(space: &mut ThoughtSpace, path: &Path) -> EngineResult<()> {
    if path.is_root() {
        return Ok(());
    }
    if space.context_views.contains(path) {
        space.context_views.remove(path);
        debug!("event=toggle_context_view module=view status=off path={path}");
        return Ok(());
    }
    let thought = space.resolve(path)?;
    let contexts = space.contexts_of(&thought.value);
    if contexts.len() < 2 {
        space.set_alert(
            AlertKind::NoContexts,
            "This thought has no other contexts",
        );
        return Ok(());
    }
    space.context_views.insert(path.clone());
    debug!("event=toggle_context_view module=view status=on path={path}");
    Ok(())
}

/// Translates a possibly view-relative path into the unambiguous real
/// path of its leaf.
///
/// A context view splices foreign contexts under the viewed thought, so
/// a path taken from the display can hold a segment whose stored parent
/// is not the segment before it. The real path is rebuilt by walking
/// parent pointers from the leaf.
pub fn simplify_path(space: &ThoughtSpace, path: &Path) -> EngineResult<SimplePath> {
    if path.is_root() {
        return Ok(SimplePath::root());
    }
    let ids = path.ids();
    let mut prev = ROOT_ID;
    let mut crossed = false;
    for &id in ids {
        let thought = space
            .thought(id)
            .ok_or_else(|| EngineError::PathUnresolved(path.to_string()))?;
        if thought.parent_id.unwrap_or(ROOT_ID) != prev {
            crossed = true;
        }
        prev = id;
    }
    if !crossed {
        return Ok(SimplePath::new(ids.to_vec()));
    }
    space
        .path_to(path.head())
        .ok_or_else(|| EngineError::PathUnresolved(path.to_string()))
}

/// Whether any active context view sits on `path` or above it.
pub(crate) fn inside_context_view(space: &ThoughtSpace, path: &Path) -> bool {
    space
        .context_views
        .iter()
        .any(|view| path.starts_with(view.ids()))
}
