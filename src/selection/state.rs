use bevy::prelude::*;

use super::raycast::RayHit;

/// A transition produced by the selection state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionEvent {
    Selected(Entity),
    Deselected(Entity),
    Missed,
}

/// At most one selected entity, plus the hit that selected it.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    selected: Option<Entity>,
    hit: Option<RayHit>,
}

impl SelectionState {
    pub fn current(&self) -> Option<Entity> {
        self.selected
    }

    pub fn current_hit(&self) -> Option<&RayHit> {
        self.hit.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Selects `selectable`, the entity resolved from `hit`.
    ///
    /// `None` means the hit entity has no selectable capability and nothing
    /// changes. Re-selecting the current entity only refreshes the stored hit.
    /// Otherwise the previous selection is deselected before the new one is
    /// selected.
    pub fn select(&mut self, hit: RayHit, selectable: Option<Entity>) -> Vec<SelectionEvent> {
        let Some(entity) = selectable else {
            return Vec::new();
        };

        if self.selected == Some(entity) {
            self.hit = Some(hit);
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.selected.take() {
            events.push(SelectionEvent::Deselected(previous));
        }
        self.selected = Some(entity);
        self.hit = Some(hit);
        events.push(SelectionEvent::Selected(entity));
        events
    }

    pub fn reset_selection(&mut self) -> Vec<SelectionEvent> {
        self.hit = None;
        match self.selected.take() {
            Some(previous) => vec![SelectionEvent::Deselected(previous)],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn hit_on(entity: Entity) -> RayHit {
        RayHit {
            entity,
            distance: 3.0,
            point: Vec3::ZERO,
        }
    }

    #[test]
    fn first_select_fires_once() {
        let a = Entity::from_raw(1);
        let mut state = SelectionState::default();
        let events = state.select(hit_on(a), Some(a));
        assert_eq!(events, vec![SelectionEvent::Selected(a)]);
        assert_eq!(state.current(), Some(a));
        assert_eq!(state.current_hit().map(|h| h.entity), Some(a));
    }

    #[test]
    fn reselecting_same_entity_is_silent() {
        let a = Entity::from_raw(1);
        let mut state = SelectionState::default();
        state.select(hit_on(a), Some(a));
        let again = state.select(
            RayHit {
                distance: 9.0,
                ..hit_on(a)
            },
            Some(a),
        );
        assert!(again.is_empty());
        assert_eq!(state.current_hit().map(|h| h.distance), Some(9.0));
    }

    #[test]
    fn switching_deselects_previous_first() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let mut state = SelectionState::default();
        state.select(hit_on(a), Some(a));
        let events = state.select(hit_on(b), Some(b));
        assert_eq!(
            events,
            vec![SelectionEvent::Deselected(a), SelectionEvent::Selected(b)]
        );
        assert_eq!(state.current(), Some(b));
    }

    #[test]
    fn non_selectable_hit_keeps_selection() {
        let a = Entity::from_raw(1);
        let wall = Entity::from_raw(5);
        let mut state = SelectionState::default();
        state.select(hit_on(a), Some(a));
        assert!(state.select(hit_on(wall), None).is_empty());
        assert_eq!(state.current(), Some(a));
        assert_eq!(state.current_hit().map(|h| h.entity), Some(a));
    }

    #[test]
    fn reset_on_empty_state_is_noop() {
        let mut state = SelectionState::default();
        assert!(state.reset_selection().is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn reset_deselects_and_clears() {
        let a = Entity::from_raw(1);
        let mut state = SelectionState::default();
        state.select(hit_on(a), Some(a));
        assert_eq!(state.reset_selection(), vec![SelectionEvent::Deselected(a)]);
        assert!(state.is_empty());
        assert!(state.current_hit().is_none());
    }

    #[test]
    fn hooks_alternate_per_entity() {
        let ids: Vec<Entity> = (0..4).map(Entity::from_raw).collect();
        let script = [0, 1, 1, 2, 0, 0, 3, 1, 2, 2, 0];
        let mut state = SelectionState::default();
        let mut selected: HashMap<Entity, bool> = HashMap::new();

        for (step, &i) in script.iter().enumerate() {
            let events = if step % 4 == 3 {
                state.reset_selection()
            } else {
                state.select(hit_on(ids[i]), Some(ids[i]))
            };
            for event in events {
                match event {
                    SelectionEvent::Selected(e) => {
                        let was = selected.insert(e, true).unwrap_or(false);
                        assert!(!was, "{e:?} selected twice in a row");
                    }
                    SelectionEvent::Deselected(e) => {
                        let was = selected.insert(e, false).unwrap_or(false);
                        assert!(was, "{e:?} deselected without being selected");
                    }
                    SelectionEvent::Missed => unreachable!(),
                }
            }
            assert!(selected.values().filter(|s| **s).count() <= 1);
        }
    }
}
