//! Hover/selection state machine
//!
//! An explicit state value owned by the frame loop, fed the resolved pick
//! result of each pointer event. Transitions come back as ordered
//! [`HighlightChange`] lists (restore-before-apply), so callers never leak a
//! stale highlight, and the renderer stays a dumb executor of the changes.

use crate::topology::ComponentId;

/// Visual highlight tier of a component group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightState {
    /// Original materials
    Normal,
    /// Weak emissive tint under the pointer
    Hovered,
    /// Strong emissive tint, survives pointer exit
    Selected,
}

/// One material transition to apply to a component group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightChange {
    pub id: ComponentId,
    pub state: HighlightState,
}

impl HighlightChange {
    fn new(id: ComponentId, state: HighlightState) -> Self {
        Self { id, state }
    }
}

/// What the info-display collaborator should show after a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoRequest {
    /// Show the component's descriptive metadata
    Show(ComponentId),
    /// Show the default help text
    Reset,
}

/// Current hovered and selected component, at most one of each.
///
/// Invariant: the selected group's highlight always wins; hover highlighting
/// is never applied to (or removed from) the current selection.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    hovered: Option<ComponentId>,
    selected: Option<ComponentId>,
}

impl InteractionState {
    pub fn hovered(&self) -> Option<&ComponentId> {
        self.hovered.as_ref()
    }

    pub fn selected(&self) -> Option<&ComponentId> {
        self.selected.as_ref()
    }

    /// Pointer moved; `hit` is the freshly resolved pick result.
    ///
    /// Returns the highlight transitions to apply, in order. An unchanged
    /// hover is a no-op so materials are not churned every frame.
    pub fn pointer_moved(&mut self, hit: Option<ComponentId>) -> Vec<HighlightChange> {
        if hit == self.hovered {
            return Vec::new();
        }

        let mut changes = Vec::new();

        if let Some(old) = self.hovered.take() {
            if self.selected.as_ref() != Some(&old) {
                changes.push(HighlightChange::new(old, HighlightState::Normal));
            }
        }

        if let Some(new) = &hit {
            if self.selected.as_ref() != Some(new) {
                changes.push(HighlightChange::new(new.clone(), HighlightState::Hovered));
            }
        }

        self.hovered = hit;
        changes
    }

    /// Pointer clicked; `hit` is the freshly resolved pick result.
    ///
    /// The previous selection is unconditionally restored first. A miss
    /// clears the selection and requests the default info text.
    pub fn pointer_clicked(
        &mut self,
        hit: Option<ComponentId>,
    ) -> (Vec<HighlightChange>, InfoRequest) {
        let mut changes = Vec::new();

        if let Some(prev) = self.selected.take() {
            changes.push(HighlightChange::new(prev, HighlightState::Normal));
        }

        match hit {
            Some(id) => {
                self.selected = Some(id.clone());
                changes.push(HighlightChange::new(id.clone(), HighlightState::Selected));
                (changes, InfoRequest::Show(id))
            }
            None => (changes, InfoRequest::Reset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s)
    }

    #[test]
    fn hover_then_unhover_restores() {
        let mut state = InteractionState::default();

        let changes = state.pointer_moved(Some(id("P-101")));
        assert_eq!(
            changes,
            vec![HighlightChange::new(id("P-101"), HighlightState::Hovered)]
        );

        let changes = state.pointer_moved(None);
        assert_eq!(
            changes,
            vec![HighlightChange::new(id("P-101"), HighlightState::Normal)]
        );
        assert!(state.hovered().is_none());
    }

    #[test]
    fn unchanged_hover_is_a_no_op() {
        let mut state = InteractionState::default();
        state.pointer_moved(Some(id("V-101")));
        assert!(state.pointer_moved(Some(id("V-101"))).is_empty());
        assert!(state.pointer_moved(Some(id("V-101"))).is_empty());
    }

    #[test]
    fn hover_handoff_restores_old_before_applying_new() {
        let mut state = InteractionState::default();
        state.pointer_moved(Some(id("A")));

        let changes = state.pointer_moved(Some(id("B")));
        assert_eq!(
            changes,
            vec![
                HighlightChange::new(id("A"), HighlightState::Normal),
                HighlightChange::new(id("B"), HighlightState::Hovered),
            ]
        );
    }

    #[test]
    fn click_selects_and_publishes_info() {
        let mut state = InteractionState::default();
        let (changes, info) = state.pointer_clicked(Some(id("C-101")));
        assert_eq!(
            changes,
            vec![HighlightChange::new(id("C-101"), HighlightState::Selected)]
        );
        assert_eq!(info, InfoRequest::Show(id("C-101")));
        assert_eq!(state.selected(), Some(&id("C-101")));
    }

    #[test]
    fn click_elsewhere_restores_previous_selection_first() {
        let mut state = InteractionState::default();
        state.pointer_clicked(Some(id("A")));

        let (changes, info) = state.pointer_clicked(Some(id("B")));
        assert_eq!(
            changes,
            vec![
                HighlightChange::new(id("A"), HighlightState::Normal),
                HighlightChange::new(id("B"), HighlightState::Selected),
            ]
        );
        assert_eq!(info, InfoRequest::Show(id("B")));
    }

    #[test]
    fn click_on_empty_space_clears_selection() {
        let mut state = InteractionState::default();
        state.pointer_clicked(Some(id("A")));

        let (changes, info) = state.pointer_clicked(None);
        assert_eq!(
            changes,
            vec![HighlightChange::new(id("A"), HighlightState::Normal)]
        );
        assert_eq!(info, InfoRequest::Reset);
        assert!(state.selected().is_none());
    }

    #[test]
    fn hovering_the_selection_never_downgrades_it() {
        let mut state = InteractionState::default();
        state.pointer_clicked(Some(id("A")));

        // Hovering the selected group applies nothing
        assert!(state.pointer_moved(Some(id("A"))).is_empty());

        // Leaving it restores nothing either; the selection highlight stays
        let changes = state.pointer_moved(None);
        assert!(changes.is_empty());
    }

    #[test]
    fn hover_leaves_selection_intact_on_other_groups() {
        let mut state = InteractionState::default();
        state.pointer_clicked(Some(id("A")));

        let changes = state.pointer_moved(Some(id("B")));
        assert_eq!(
            changes,
            vec![HighlightChange::new(id("B"), HighlightState::Hovered)]
        );

        // Moving from B onto the selection restores only B
        let changes = state.pointer_moved(Some(id("A")));
        assert_eq!(
            changes,
            vec![HighlightChange::new(id("B"), HighlightState::Normal)]
        );
    }

    #[test]
    fn selecting_the_hovered_group_upgrades_it() {
        let mut state = InteractionState::default();
        state.pointer_moved(Some(id("A")));

        let (changes, _) = state.pointer_clicked(Some(id("A")));
        assert_eq!(
            changes,
            vec![HighlightChange::new(id("A"), HighlightState::Selected)]
        );
    }
}
