//! Widget state for the form controls.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use strum::IntoEnumIterator;
use tui_textarea::{CursorMove, TextArea};

use super::page::{FieldId, FieldKind, HEALTH_ON_FAILURE_OPTIONS, IMAGE_VOLUME_OPTIONS, SelectSource};

/// Single line text input.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub input: TextArea<'static>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> String {
        self.input.lines().first().cloned().unwrap_or_default()
    }

    pub fn set_value(&mut self, value: &str) {
        let first_line = value.lines().next().unwrap_or("").to_string();
        self.input = TextArea::from(vec![first_line]);
        self.input.move_cursor(CursorMove::End);
    }

    pub fn reset(&mut self) {
        self.input = TextArea::default();
    }

    /// Feed a key to the editor. Keys that would break the single line
    /// invariant, and control or alt chords, are refused.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        if matches!(key.code, KeyCode::Enter | KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc) {
            return false;
        }
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        self.input.input(key)
    }

    /// Insert clipboard text at the cursor. Only the first line is kept.
    pub fn paste(&mut self, text: &str) {
        let first_line = text.lines().next().unwrap_or("");
        self.input.insert_str(first_line);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleField {
    pub checked: bool,
}

impl ToggleField {
    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEntry {
    pub label: String,
    pub identity: String,
}

impl SelectEntry {
    pub fn new(label: impl Into<String>, identity: impl Into<String>) -> Self {
        Self { label: label.into(), identity: identity.into() }
    }

    /// The empty first entry of a source-backed select.
    pub fn sentinel() -> Self {
        Self::new("", "")
    }
}

/// Dropdown with a committed entry and, while open, a highlighted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    entries: Vec<SelectEntry>,
    selected: usize,
    highlighted: usize,
    expanded: bool,
}

impl Default for SelectField {
    fn default() -> Self {
        Self::with_sentinel(Vec::new())
    }
}

impl SelectField {
    /// Entries from a source, preceded by the unset entry.
    pub fn with_sentinel(entries: Vec<SelectEntry>) -> Self {
        let mut all = Vec::with_capacity(entries.len() + 1);
        all.push(SelectEntry::sentinel());
        all.extend(entries);
        Self::fixed_entries(all)
    }

    /// A fixed option list where each label is also the identity.
    pub fn fixed(options: &[&str]) -> Self {
        Self::fixed_entries(options.iter().map(|o| SelectEntry::new(*o, *o)).collect())
    }

    fn fixed_entries(entries: Vec<SelectEntry>) -> Self {
        Self {
            entries,
            selected: 0,
            highlighted: 0,
            expanded: false,
        }
    }

    pub fn entries(&self) -> &[SelectEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn selected_entry(&self) -> Option<&SelectEntry> {
        self.entries.get(self.selected)
    }

    pub fn identity(&self) -> &str {
        self.selected_entry().map(|e| e.identity.as_str()).unwrap_or("")
    }

    /// Commit an entry directly. Out of range indexes are refused.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.selected = index;
        self.highlighted = index;
        true
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.highlighted = 0;
        self.expanded = false;
    }

    pub fn open(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.highlighted = self.selected;
        self.expanded = true;
    }

    /// Close without changing the committed entry.
    pub fn close(&mut self) {
        self.highlighted = self.selected;
        self.expanded = false;
    }

    pub fn commit(&mut self) {
        if self.highlighted < self.entries.len() {
            self.selected = self.highlighted;
        }
        self.expanded = false;
    }

    pub fn highlight_next(&mut self) {
        if self.highlighted + 1 < self.entries.len() {
            self.highlighted += 1;
        }
    }

    pub fn highlight_previous(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn highlight_first(&mut self) {
        self.highlighted = 0;
    }

    pub fn highlight_last(&mut self) {
        self.highlighted = self.entries.len().saturating_sub(1);
    }
}

/// Raw value of a widget, as read back or written by tests and callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Toggle(bool),
    Select(usize),
}

#[derive(Debug, Clone)]
pub enum FieldWidget {
    Text(TextField),
    Toggle(ToggleField),
    Select(SelectField),
}

impl FieldWidget {
    fn for_field(field: FieldId) -> Self {
        match field.kind() {
            FieldKind::Text => FieldWidget::Text(TextField::new()),
            FieldKind::Toggle => FieldWidget::Toggle(ToggleField::default()),
            FieldKind::Select => FieldWidget::Select(match field.select_source() {
                Some(SelectSource::ImageVolume) => SelectField::fixed(&IMAGE_VOLUME_OPTIONS),
                Some(SelectSource::HealthOnFailure) => SelectField::fixed(&HEALTH_ON_FAILURE_OPTIONS),
                _ => SelectField::default(),
            }),
        }
    }

    pub fn value(&self) -> FieldValue {
        match self {
            FieldWidget::Text(text) => FieldValue::Text(text.value()),
            FieldWidget::Toggle(toggle) => FieldValue::Toggle(toggle.checked),
            FieldWidget::Select(select) => FieldValue::Select(select.selected()),
        }
    }

    /// Returns false when the value does not fit the widget.
    pub fn set_value(&mut self, value: FieldValue) -> bool {
        match (self, value) {
            (FieldWidget::Text(text), FieldValue::Text(v)) => {
                text.set_value(&v);
                true
            }
            (FieldWidget::Toggle(toggle), FieldValue::Toggle(v)) => {
                toggle.checked = v;
                true
            }
            (FieldWidget::Select(select), FieldValue::Select(index)) => select.select(index),
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        match self {
            FieldWidget::Text(text) => text.reset(),
            FieldWidget::Toggle(toggle) => toggle.checked = false,
            FieldWidget::Select(select) => select.reset(),
        }
    }
}

/// All widgets of the form, keyed by field.
#[derive(Debug, Clone, Deref, DerefMut)]
pub struct FieldSet(BTreeMap<FieldId, FieldWidget>);

impl Default for FieldSet {
    fn default() -> Self {
        Self(FieldId::iter().map(|f| (f, FieldWidget::for_field(f))).collect())
    }
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.0.values_mut().for_each(FieldWidget::reset);
    }

    pub fn value(&self, field: FieldId) -> Option<FieldValue> {
        self.0.get(&field).map(FieldWidget::value)
    }

    pub fn set_value(&mut self, field: FieldId, value: FieldValue) -> bool {
        self.0.get_mut(&field).is_some_and(|w| w.set_value(value))
    }

    pub fn text(&self, field: FieldId) -> Option<&TextField> {
        match self.0.get(&field) {
            Some(FieldWidget::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, field: FieldId) -> Option<&mut TextField> {
        match self.0.get_mut(&field) {
            Some(FieldWidget::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn toggle(&self, field: FieldId) -> Option<&ToggleField> {
        match self.0.get(&field) {
            Some(FieldWidget::Toggle(toggle)) => Some(toggle),
            _ => None,
        }
    }

    /// Fold up every open dropdown without committing its highlight.
    pub fn close_selects(&mut self) {
        for widget in self.0.values_mut() {
            if let FieldWidget::Select(select) = widget {
                select.close();
            }
        }
    }

    pub fn select(&self, field: FieldId) -> Option<&SelectField> {
        match self.0.get(&field) {
            Some(FieldWidget::Select(select)) => Some(select),
            _ => None,
        }
    }

    pub fn select_mut(&mut self, field: FieldId) -> Option<&mut SelectField> {
        match self.0.get_mut(&field) {
            Some(FieldWidget::Select(select)) => Some(select),
            _ => None,
        }
    }

    /// Replace the entries of a source-backed select; the selection restarts
    /// at the unset entry.
    pub fn set_select_entries(&mut self, field: FieldId, entries: Vec<SelectEntry>) {
        if let Some(select) = self.select_mut(field) {
            *select = SelectField::with_sentinel(entries);
        }
    }
}
