//! Keyboard focus over the category list, the fields of the active page and
//! the form buttons.
//!
//! Transitions are plain functions from one [`FocusState`] to the next so
//! they can be checked without a terminal.

use serde::{Deserialize, Serialize};

use super::page::PageModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusTarget {
    /// The page has just been shown and nothing inside it is focused yet.
    PageEntry,
    CategoryList,
    /// Position in the active category's focus order.
    Field(usize),
    /// Index into the form buttons, left to right.
    Button(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusState {
    pub active_category: usize,
    pub target: FocusTarget,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            active_category: 0,
            target: FocusTarget::PageEntry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRing {
    field_counts: Vec<usize>,
    button_count: usize,
}

impl FocusRing {
    pub fn new(model: &PageModel, button_count: usize) -> Self {
        Self {
            field_counts: model.field_counts(),
            button_count: button_count.max(1),
        }
    }

    pub fn category_count(&self) -> usize {
        self.field_counts.len()
    }

    /// The rightmost button confirms the form.
    pub fn submit_button(&self) -> usize {
        self.button_count - 1
    }

    /// State right after the dialog is shown.
    pub fn activate(&self) -> FocusState {
        FocusState::default()
    }

    /// Turn a pending page entry into focus on the first field.
    pub fn resolve(&self, state: FocusState) -> FocusState {
        match state.target {
            FocusTarget::PageEntry => FocusState {
                target: FocusTarget::Field(0),
                ..state
            },
            _ => state,
        }
    }

    pub fn tab(&self, state: FocusState) -> FocusState {
        let state = self.resolve(state);
        let field_count = self.field_counts.get(state.active_category).copied().unwrap_or(0);
        let target = match state.target {
            FocusTarget::Field(i) if i + 1 < field_count => FocusTarget::Field(i + 1),
            FocusTarget::Field(_) => FocusTarget::Button(self.submit_button()),
            FocusTarget::Button(_) => FocusTarget::CategoryList,
            FocusTarget::CategoryList | FocusTarget::PageEntry => FocusTarget::Field(0),
        };
        FocusState { target, ..state }
    }

    /// Move to another page. Focus stays on the category list when it is
    /// there; anywhere else it falls back to the entry of the new page.
    fn switch_to(&self, state: FocusState, index: usize) -> FocusState {
        let target = match state.target {
            FocusTarget::CategoryList => FocusTarget::CategoryList,
            _ => FocusTarget::PageEntry,
        };
        FocusState {
            active_category: index,
            target,
        }
    }

    pub fn next_category(&self, state: FocusState) -> FocusState {
        let count = self.category_count().max(1);
        self.switch_to(state, (state.active_category + 1) % count)
    }

    pub fn previous_category(&self, state: FocusState) -> FocusState {
        let count = self.category_count().max(1);
        self.switch_to(state, (state.active_category + count - 1) % count)
    }

    /// Jump to a category; out of range indexes leave the state unchanged.
    pub fn select_category(&self, state: FocusState, index: usize) -> FocusState {
        if index >= self.category_count() {
            return state;
        }
        self.switch_to(state, index)
    }

    pub fn button_left(&self, state: FocusState) -> FocusState {
        match state.target {
            FocusTarget::Button(b) => FocusState {
                target: FocusTarget::Button(b.saturating_sub(1)),
                ..state
            },
            _ => state,
        }
    }

    pub fn button_right(&self, state: FocusState) -> FocusState {
        match state.target {
            FocusTarget::Button(b) => FocusState {
                target: FocusTarget::Button((b + 1).min(self.submit_button())),
                ..state
            },
            _ => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ring() -> FocusRing {
        FocusRing::new(&PageModel::container_create(), 2)
    }

    #[test]
    fn test_activation_resolves_to_first_field() {
        let ring = ring();
        let state = ring.activate();
        assert_eq!(state.target, FocusTarget::PageEntry);
        assert_eq!(ring.resolve(state).target, FocusTarget::Field(0));
        let on_list = FocusState { active_category: 3, target: FocusTarget::CategoryList };
        assert_eq!(ring.resolve(on_list), on_list);
    }

    #[test]
    fn test_tab_cycle_closes_for_every_category() {
        let ring = ring();
        let model = PageModel::container_create();
        for category in &model.categories {
            let mut state = FocusState {
                active_category: category.index,
                target: FocusTarget::Field(0),
            };
            for step in 1..category.fields.len() {
                state = ring.tab(state);
                assert_eq!(state.target, FocusTarget::Field(step), "{}", category.label);
            }
            state = ring.tab(state);
            assert_eq!(state.target, FocusTarget::Button(1), "{}", category.label);
            state = ring.tab(state);
            assert_eq!(state.target, FocusTarget::CategoryList);
            state = ring.tab(state);
            assert_eq!(state.target, FocusTarget::Field(0));
            assert_eq!(state.active_category, category.index);
        }
    }

    #[test]
    fn test_button_cursor_resets_after_leaving() {
        let ring = ring();
        let state = FocusState { active_category: 6, target: FocusTarget::Field(2) };
        let on_submit = ring.tab(state);
        let on_cancel = ring.button_left(on_submit);
        assert_eq!(on_cancel.target, FocusTarget::Button(0));
        assert_eq!(ring.button_left(on_cancel).target, FocusTarget::Button(0));

        let mut state = ring.tab(on_cancel);
        assert_eq!(state.target, FocusTarget::CategoryList);
        for _ in 0..4 {
            state = ring.tab(state);
        }
        assert_eq!(state.target, FocusTarget::Button(1));
        assert_eq!(ring.button_right(state).target, FocusTarget::Button(1));
    }

    #[test]
    fn test_category_wraparound() {
        let ring = ring();
        let count = ring.category_count();
        for start in 0..count {
            let mut state = FocusState { active_category: start, target: FocusTarget::CategoryList };
            for _ in 0..count {
                state = ring.next_category(state);
            }
            assert_eq!(state.active_category, start);
            for _ in 0..count {
                state = ring.previous_category(state);
            }
            assert_eq!(state.active_category, start);
        }

        let first = FocusState { active_category: 0, target: FocusTarget::CategoryList };
        assert_eq!(ring.previous_category(first).active_category, count - 1);
        let last = FocusState { active_category: count - 1, target: FocusTarget::CategoryList };
        assert_eq!(ring.next_category(last).active_category, 0);
    }

    #[test]
    fn test_select_category_out_of_range() {
        let ring = ring();
        let state = ring.activate();
        assert_eq!(ring.select_category(state, 42), state);
        assert_eq!(ring.select_category(state, 8).active_category, 8);
    }

    #[test]
    fn test_category_switch_drops_stale_field_index() {
        let ring = ring();
        let on_timeout = FocusState { active_category: 0, target: FocusTarget::Field(6) };

        let switched = ring.select_category(on_timeout, 3);
        assert_eq!(switched, FocusState { active_category: 3, target: FocusTarget::PageEntry });
        assert_eq!(ring.tab(switched).target, FocusTarget::Field(1));

        assert_eq!(ring.next_category(on_timeout).target, FocusTarget::PageEntry);
        assert_eq!(ring.previous_category(on_timeout).target, FocusTarget::PageEntry);
        let on_button = FocusState { active_category: 0, target: FocusTarget::Button(1) };
        assert_eq!(ring.next_category(on_button).target, FocusTarget::PageEntry);

        let on_list = FocusState { active_category: 0, target: FocusTarget::CategoryList };
        assert_eq!(ring.next_category(on_list).target, FocusTarget::CategoryList);
    }

    #[test]
    fn test_tab_from_page_entry_handles_key_after_resolving() {
        let ring = ring();
        assert_eq!(ring.tab(ring.activate()).target, FocusTarget::Field(1));
    }
}
