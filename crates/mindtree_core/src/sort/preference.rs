//! Sort preference model and the toggle cycle.
//!
//! # Responsibility
//! - Define the `{type, direction}` preference governing automatic
//!   child ordering, and its cycling state machine.
//!
//! # Invariants
//! - `None` means manual order and carries no direction.
//! - Cycling from an ascending preference flips direction without
//!   advancing the type.

use serde::{Deserialize, Serialize};

/// Comparator family for automatic child ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    /// Manual order; ranks are authoritative.
    None,
    /// Normalized value order.
    Alphabetical,
    /// Creation timestamp order.
    Created,
    /// Last-update timestamp order.
    Updated,
    /// Order by the text of the `=note` attribute; noteless last.
    Note,
}

impl SortType {
    /// Attribute value stored under `=sort`.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Alphabetical => "Alphabetical",
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Note => "Note",
        }
    }

    /// Parses the attribute value form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "None" => Some(Self::None),
            "Alphabetical" => Some(Self::Alphabetical),
            "Created" => Some(Self::Created),
            "Updated" => Some(Self::Updated),
            "Note" => Some(Self::Note),
            _ => None,
        }
    }

    /// Next type in the toggle cycle. The cycle alternates between
    /// manual and alphabetical order; the temporal and note types are
    /// reached by setting `=sort` directly and cycle back to manual.
    pub fn next_in_cycle(self) -> Self {
        match self {
            Self::None => Self::Alphabetical,
            _ => Self::None,
        }
    }
}

/// Direction of an active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Asc => "Asc",
            Self::Desc => "Desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Asc" => Some(Self::Asc),
            "Desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Per-context sort preference resolved from the `=sort` attribute
/// chain or the global default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPreference {
    #[serde(rename = "type")]
    pub kind: SortType,
    pub direction: Option<SortDirection>,
}

impl SortPreference {
    pub fn new(kind: SortType, direction: Option<SortDirection>) -> Self {
        Self { kind, direction }
    }

    /// Whether a non-manual comparator is active.
    pub fn is_sorted(&self) -> bool {
        self.kind != SortType::None
    }

    /// One step of the toggle state machine: ascending flips to
    /// descending without advancing the type; otherwise the type
    /// advances in the fixed cycle and direction resets.
    pub fn cycled(&self) -> SortPreference {
        if self.is_sorted() && self.direction == Some(SortDirection::Asc) {
            return SortPreference::new(self.kind, Some(SortDirection::Desc));
        }
        let next = self.kind.next_in_cycle();
        let direction = if next == SortType::None {
            None
        } else {
            Some(SortDirection::Asc)
        };
        SortPreference::new(next, direction)
    }
}

impl Default for SortPreference {
    fn default() -> Self {
        Self::new(SortType::None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::{SortDirection, SortPreference, SortType};

    #[test]
    fn cycle_from_manual_goes_alphabetical_ascending() {
        let next = SortPreference::default().cycled();
        assert_eq!(next.kind, SortType::Alphabetical);
        assert_eq!(next.direction, Some(SortDirection::Asc));
    }

    #[test]
    fn ascending_flips_to_descending_without_advancing() {
        let current =
            SortPreference::new(SortType::Alphabetical, Some(SortDirection::Asc));
        let next = current.cycled();
        assert_eq!(next.kind, SortType::Alphabetical);
        assert_eq!(next.direction, Some(SortDirection::Desc));
    }

    #[test]
    fn descending_advances_back_to_manual() {
        let current =
            SortPreference::new(SortType::Alphabetical, Some(SortDirection::Desc));
        let next = current.cycled();
        assert_eq!(next.kind, SortType::None);
        assert_eq!(next.direction, None);
    }

    #[test]
    fn labels_round_trip() {
        for kind in [
            SortType::None,
            SortType::Alphabetical,
            SortType::Created,
            SortType::Updated,
            SortType::Note,
        ] {
            assert_eq!(SortType::parse(kind.label()), Some(kind));
        }
        assert_eq!(
            SortDirection::parse(SortDirection::Desc.label()),
            Some(SortDirection::Desc)
        );
    }
}
