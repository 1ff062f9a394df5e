use crate::model::Label;

/// Identifies a primary sector, or one of its children when `child` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectorRef {
    pub sector: Label,
    pub child: Option<Label>,
}

impl SectorRef {
    pub fn inner(sector: Label) -> Self {
        Self {
            sector,
            child: None,
        }
    }

    pub fn child(sector: Label, child: Label) -> Self {
        Self {
            sector,
            child: Some(child),
        }
    }

    pub fn is_child(&self) -> bool {
        self.child.is_some()
    }

    /// The label of the node itself.
    pub fn label(&self) -> &Label {
        self.child.as_ref().unwrap_or(&self.sector)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Inner,
    Child,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    pub label: Label,
    /// Set for child drags only.
    pub parent: Option<Label>,
    pub hover_target: Option<Label>,
}

/// Runtime selection of a menu surface. One variant at a time, so a drag
/// cannot coexist with a lock.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    None,
    Hover {
        sector: Label,
        child: Option<Label>,
    },
    Locked {
        sector: Label,
        child: Option<Label>,
        /// The child highlighted right now. Tracks the pointer inside the
        /// child band and falls back to `child` outside it.
        hovered_child: Option<Label>,
    },
    Dragging(DragSession),
}

impl SelectionState {
    pub fn locked(target: SectorRef) -> Self {
        Self::Locked {
            hovered_child: target.child.clone(),
            sector: target.sector,
            child: target.child,
        }
    }

    pub fn active_sector(&self) -> Option<&Label> {
        match self {
            Self::Hover { sector, .. } | Self::Locked { sector, .. } => Some(sector),
            Self::Dragging(session) => session.parent.as_ref(),
            Self::None => None,
        }
    }

    pub fn outer_active(&self) -> Option<&Label> {
        match self {
            Self::Hover { child, .. } => child.as_ref(),
            Self::Locked { hovered_child, .. } => hovered_child.as_ref(),
            _ => None,
        }
    }

    pub fn sticky(&self) -> Option<SectorRef> {
        match self {
            Self::Locked { sector, child, .. } => Some(SectorRef {
                sector: sector.clone(),
                child: child.clone(),
            }),
            _ => None,
        }
    }

    /// What the pointer points at: the highlighted child, else the sector.
    pub fn target(&self) -> Option<SectorRef> {
        let sector = self.active_sector()?.clone();
        match self.outer_active() {
            Some(child) => Some(SectorRef::child(sector, child.clone())),
            None => Some(SectorRef::inner(sector)),
        }
    }

    pub fn drag(&self) -> Option<&DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_child_is_the_target() {
        let state = SelectionState::locked(SectorRef::child(Label::new("Tools"), Label::new("Move")));
        assert_eq!(state.active_sector().unwrap(), "Tools");
        assert_eq!(state.outer_active().unwrap(), "Move");
        assert_eq!(state.target().unwrap().label(), "Move");
        assert!(state.is_locked());
    }

    #[test]
    fn test_empty_selection_has_no_target() {
        let state = SelectionState::None;
        assert!(state.target().is_none());
        assert!(state.sticky().is_none());
        assert!(!state.is_dragging());
    }
}
