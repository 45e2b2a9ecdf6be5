//! ContainerCreateDialog: multi-page form collecting the parameters of a new container

use std::sync::Arc;

use arboard::Clipboard;
use color_eyre::Result;
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::Frame;
use ratatui::prelude::*;
use tracing::{debug, info};

use crate::action::Action;
use crate::components::Component;
use crate::config::{Config, Mode};
use crate::core::{ContainerCreateOptions, OptionSource};
use crate::tui::Event;

pub mod extract;
pub mod fields;
pub mod focus;
pub mod options;
pub mod page;
mod render;

pub use extract::{Extracted, FieldExtractor, RequestBuilder, tokenize};
pub use fields::{FieldSet, FieldValue, FieldWidget, SelectEntry, SelectField, TextField, ToggleField};
pub use focus::{FocusRing, FocusState, FocusTarget};
pub use options::{Candidate, CandidateList, OptionSnapshot};
pub use page::{Category, FieldId, FieldKind, PageModel, TextRule};

pub const DIALOG_TITLE: &str = "PODMAN CONTAINER CREATE";
pub const DIALOG_MAX_WIDTH: u16 = 100;
pub const DIALOG_MAX_HEIGHT: u16 = 20;
pub const BUTTONS: [&str; 2] = ["Cancel", "Create"];
const CANCEL_BUTTON: usize = 0;

pub struct ContainerCreateDialog {
    model: PageModel,
    ring: FocusRing,
    focus: FocusState,
    fields: FieldSet,
    snapshot: OptionSnapshot,
    source: Arc<dyn OptionSource>,
    display: bool,
    pub show_instructions: bool,
    config: Config,
}

impl std::fmt::Debug for ContainerCreateDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerCreateDialog")
            .field("focus", &self.focus)
            .field("display", &self.display)
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl ContainerCreateDialog {
    pub fn new(source: Arc<dyn OptionSource>) -> Self {
        let model = PageModel::container_create();
        let ring = FocusRing::new(&model, BUTTONS.len());
        Self {
            focus: ring.activate(),
            model,
            ring,
            fields: FieldSet::new(),
            snapshot: OptionSnapshot::default(),
            source,
            display: false,
            show_instructions: true,
            config: Config::default(),
        }
    }

    /// Show the dialog with every field back at its default and freshly
    /// listed images, pods, networks and volumes.
    pub fn display(&mut self) {
        self.display = true;
        self.init_data();
        self.focus = self.ring.activate();
        info!("container create dialog displayed");
    }

    pub fn hide(&mut self) {
        self.display = false;
    }

    pub fn is_display(&self) -> bool {
        self.display
    }

    pub fn has_focus(&self) -> bool {
        self.display
    }

    fn init_data(&mut self) {
        self.snapshot = OptionSnapshot::load(self.source.as_ref());
        self.fields.reset();
        self.fields.set_select_entries(FieldId::Image, self.snapshot.images.entries());
        self.fields.set_select_entries(FieldId::Pod, self.snapshot.pods.entries());
        self.fields.set_select_entries(FieldId::Network, self.snapshot.networks.entries());
    }

    pub fn model(&self) -> &PageModel {
        &self.model
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn snapshot(&self) -> &OptionSnapshot {
        &self.snapshot
    }

    pub fn active_category(&self) -> usize {
        self.focus.active_category
    }

    pub fn set_active_category(&mut self, index: usize) {
        self.move_focus(self.ring.select_category(self.focus, index));
    }

    pub fn next_category(&mut self) {
        self.move_focus(self.ring.next_category(self.focus));
    }

    pub fn previous_category(&mut self) {
        self.move_focus(self.ring.previous_category(self.focus));
    }

    /// Put focus on a field, switching to its page.
    pub fn focus_field(&mut self, field: FieldId) {
        if let Some((category, position)) = self.model.locate(field) {
            self.move_focus(FocusState {
                active_category: category,
                target: FocusTarget::Field(position),
            });
        }
    }

    /// A dropdown never stays open once its field loses focus.
    fn move_focus(&mut self, focus: FocusState) {
        if focus != self.focus {
            self.fields.close_selects();
        }
        self.focus = focus;
    }

    pub fn set_field_value(&mut self, field: FieldId, value: FieldValue) -> bool {
        self.fields.set_value(field, value)
    }

    pub fn field_value(&self, field: FieldId) -> Option<FieldValue> {
        self.fields.value(field)
    }

    /// The field that currently owns the keyboard, if any.
    pub fn focused_field(&self) -> Option<FieldId> {
        match self.focus.target {
            FocusTarget::Field(i) => self
                .model
                .category(self.focus.active_category)
                .and_then(|c| c.fields.get(i))
                .copied(),
            _ => None,
        }
    }

    fn focused_text_field(&self) -> bool {
        self.focused_field().is_some_and(|f| f.kind() == FieldKind::Text)
    }

    fn expanded_select(&mut self) -> Option<&mut SelectField> {
        let field = self.focused_field()?;
        self.fields.select_mut(field).filter(|s| s.is_expanded())
    }

    /// Assemble the request from the current widget state.
    pub fn container_create_options(&self) -> ContainerCreateOptions {
        let mut builder = RequestBuilder::new();
        builder.apply_all(&self.model, &self.fields, &self.snapshot);
        builder.build()
    }

    /// Build instructions string from configured keybindings
    fn build_instructions_from_config(&self) -> String {
        self.config.actions_to_instructions(&[
            (Mode::Global, Action::Tab),
            (Mode::Global, Action::Up),
            (Mode::Global, Action::Down),
            (Mode::Global, Action::Enter),
            (Mode::ContainerCreate, Action::ToggleSpace),
            (Mode::Global, Action::Paste),
            (Mode::Global, Action::Escape),
            (Mode::Global, Action::ToggleInstructions),
        ])
    }

    fn cancel(&mut self) -> Option<Action> {
        info!("container create dialog cancelled");
        self.hide();
        Some(Action::DialogClose)
    }

    fn submit(&mut self) -> Option<Action> {
        let opts = self.container_create_options();
        info!(name = %opts.name, image = %opts.image, "container create requested");
        self.hide();
        Some(Action::ContainerCreate(Box::new(opts)))
    }

    fn paste_into_focused(&mut self, text: &str) {
        if let Some(field) = self.focused_field()
            && let Some(input) = self.fields.text_mut(field)
        {
            input.paste(text);
        }
    }

    fn paste_from_clipboard(&mut self) {
        if !self.focused_text_field() {
            return;
        }
        match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => self.paste_into_focused(&text),
            Err(err) => debug!("clipboard unavailable: {err}"),
        }
    }

    /// Keys while a dropdown list is open. Everything else is swallowed.
    fn handle_expanded_select(&mut self, action: Option<Action>) -> Option<Action> {
        let select = self.expanded_select()?;
        match action {
            Some(Action::Up) => select.highlight_previous(),
            Some(Action::Down) => select.highlight_next(),
            Some(Action::GoToFirst) => select.highlight_first(),
            Some(Action::GoToLast) => select.highlight_last(),
            Some(Action::Enter) | Some(Action::ToggleSpace) => select.commit(),
            Some(Action::Escape) | Some(Action::Tab) => select.close(),
            Some(Action::Quit) => return Some(Action::Quit),
            _ => {}
        }
        None
    }

    fn handle_enter(&mut self) -> Option<Action> {
        match self.focus.target {
            FocusTarget::Button(CANCEL_BUTTON) => self.cancel(),
            FocusTarget::Button(_) => self.submit(),
            FocusTarget::CategoryList => {
                self.focus = self.ring.tab(self.focus);
                None
            }
            FocusTarget::Field(_) | FocusTarget::PageEntry => {
                self.activate_focused_field();
                None
            }
        }
    }

    /// Flip a toggle or open a dropdown. Text fields ignore it.
    fn activate_focused_field(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        match self.fields.get_mut(&field) {
            Some(FieldWidget::Toggle(toggle)) => toggle.toggle(),
            Some(FieldWidget::Select(select)) => select.open(),
            _ => {}
        }
    }

    fn handle_vertical(&mut self, up: bool) {
        if self.focus.target == FocusTarget::CategoryList {
            if up {
                self.previous_category();
            } else {
                self.next_category();
            }
            debug!("container create: category {}", self.focus.active_category);
        }
    }

    fn forward_to_text(&mut self, key: KeyEvent) {
        if let Some(field) = self.focused_field()
            && let Some(input) = self.fields.text_mut(field)
        {
            input.input(key);
        }
    }
}

impl Component for ContainerCreateDialog {
    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
        match event {
            Some(Event::Key(key)) => self.handle_key_event(key),
            Some(Event::Paste(text)) if self.display => {
                self.focus = self.ring.resolve(self.focus);
                self.paste_into_focused(&text);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if !self.display || key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        self.focus = self.ring.resolve(self.focus);

        let text_focused = self.focused_text_field();
        let action = self.config.action_for_key(Mode::Global, key).or_else(|| {
            if text_focused {
                None
            } else {
                self.config.action_for_key(Mode::ContainerCreate, key)
            }
        });
        debug!("container create: key {:?} -> {:?} at {:?}", key.code, action, self.focus.target);

        if self.expanded_select().is_some() {
            return Ok(self.handle_expanded_select(action));
        }

        let result = match action {
            Some(Action::Quit) => Some(Action::Quit),
            Some(Action::Escape) => self.cancel(),
            Some(Action::ToggleInstructions) => {
                self.show_instructions = !self.show_instructions;
                None
            }
            Some(Action::Tab) => {
                self.focus = self.ring.tab(self.focus);
                None
            }
            Some(Action::Up) => {
                self.handle_vertical(true);
                None
            }
            Some(Action::Down) => {
                self.handle_vertical(false);
                None
            }
            Some(Action::Left) if matches!(self.focus.target, FocusTarget::Button(_)) => {
                self.focus = self.ring.button_left(self.focus);
                None
            }
            Some(Action::Right) if matches!(self.focus.target, FocusTarget::Button(_)) => {
                self.focus = self.ring.button_right(self.focus);
                None
            }
            Some(Action::Enter) => self.handle_enter(),
            Some(Action::ToggleSpace) => {
                self.activate_focused_field();
                None
            }
            Some(Action::Paste) => {
                self.paste_from_clipboard();
                None
            }
            Some(Action::Left)
            | Some(Action::Right)
            | Some(Action::Backspace)
            | Some(Action::Delete)
            | Some(Action::GoToFirst)
            | Some(Action::GoToLast)
            | None => {
                if text_focused {
                    self.forward_to_text(key);
                }
                None
            }
            Some(_) => None,
        };
        Ok(result)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        if self.display {
            self.render(area, frame.buffer_mut());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{ImageSummary, Inventory, NetworkSummary, PodSummary};

    fn press(dialog: &mut ContainerCreateDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_text(dialog: &mut ContainerCreateDialog, text: &str) {
        for c in text.chars() {
            press(dialog, KeyCode::Char(c));
        }
    }

    fn dialog() -> ContainerCreateDialog {
        let inventory = Inventory {
            images: vec![ImageSummary::new("i1", "docker.io/library/nginx", "1.27")],
            pods: vec![PodSummary::new("p1", "web-pod")],
            networks: vec![NetworkSummary::new("podman"), NetworkSummary::new("backend")],
            ..Default::default()
        };
        let mut dialog = ContainerCreateDialog::new(Arc::new(inventory));
        dialog.display();
        dialog
    }

    #[test]
    fn test_hidden_dialog_ignores_keys() {
        let mut dialog = ContainerCreateDialog::new(Arc::new(Inventory::default()));
        assert!(!dialog.is_display());
        assert_eq!(press(&mut dialog, KeyCode::Esc), None);
    }

    #[test]
    fn test_typing_goes_to_first_field() {
        let mut dialog = dialog();
        assert_eq!(dialog.focus().target, FocusTarget::PageEntry);
        type_text(&mut dialog, "jk web");
        assert_eq!(dialog.focus().target, FocusTarget::Field(0));
        assert_eq!(dialog.field_value(FieldId::Name), Some(FieldValue::Text("jk web".into())));
    }

    #[test]
    fn test_select_with_keyboard() {
        let mut dialog = dialog();
        dialog.focus_field(FieldId::Image);
        press(&mut dialog, KeyCode::Enter);
        press(&mut dialog, KeyCode::Char('j'));
        press(&mut dialog, KeyCode::Enter);
        assert_eq!(dialog.container_create_options().image, "i1");

        dialog.focus_field(FieldId::Network);
        press(&mut dialog, KeyCode::Char(' '));
        press(&mut dialog, KeyCode::Down);
        press(&mut dialog, KeyCode::Down);
        press(&mut dialog, KeyCode::Enter);
        assert_eq!(dialog.container_create_options().network, "backend");
    }

    #[test]
    fn test_escape_closes_open_select_only() {
        let mut dialog = dialog();
        dialog.focus_field(FieldId::Pod);
        press(&mut dialog, KeyCode::Enter);
        press(&mut dialog, KeyCode::Down);
        assert_eq!(press(&mut dialog, KeyCode::Esc), None);
        assert!(dialog.is_display());
        assert_eq!(dialog.container_create_options().pod, "");

        assert_eq!(press(&mut dialog, KeyCode::Esc), Some(Action::DialogClose));
        assert!(!dialog.is_display());
    }

    #[test]
    fn test_toggle_with_space_and_enter() {
        let mut dialog = dialog();
        dialog.focus_field(FieldId::Privileged);
        press(&mut dialog, KeyCode::Char(' '));
        dialog.focus_field(FieldId::Remove);
        press(&mut dialog, KeyCode::Enter);
        let opts = dialog.container_create_options();
        assert!(opts.privileged);
        assert!(opts.remove);
    }

    #[test]
    fn test_category_list_navigation() {
        let mut dialog = dialog();
        dialog.focus_field(FieldId::Timeout);
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focus().target, FocusTarget::CategoryList);
        press(&mut dialog, KeyCode::Up);
        assert_eq!(dialog.active_category(), 8);
        press(&mut dialog, KeyCode::Char('j'));
        press(&mut dialog, KeyCode::Down);
        assert_eq!(dialog.active_category(), 1);
        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focused_field(), Some(FieldId::WorkDir));
    }

    #[test]
    fn test_switching_category_from_last_field_enters_new_page() {
        let mut dialog = dialog();
        dialog.focus_field(FieldId::Timeout);
        assert_eq!(dialog.focus().target, FocusTarget::Field(6));

        dialog.set_active_category(3);
        assert_eq!(dialog.focus().target, FocusTarget::PageEntry);
        type_text(&mut dialog, "1.1.1.1");
        assert_eq!(dialog.focused_field(), Some(FieldId::DnsServers));
        assert_eq!(dialog.container_create_options().dns_server, vec!["1.1.1.1"]);

        press(&mut dialog, KeyCode::Tab);
        assert_eq!(dialog.focus().target, FocusTarget::Field(1));

        dialog.next_category();
        assert_eq!(dialog.focus().target, FocusTarget::PageEntry);
        assert_eq!(dialog.active_category(), 4);
    }

    #[test]
    fn test_moving_focus_closes_open_select() {
        let mut dialog = dialog();
        dialog.focus_field(FieldId::Pod);
        press(&mut dialog, KeyCode::Enter);
        press(&mut dialog, KeyCode::Down);
        assert!(dialog.fields().select(FieldId::Pod).is_some_and(SelectField::is_expanded));

        dialog.focus_field(FieldId::Name);
        let pod = dialog.fields().select(FieldId::Pod).expect("pod select");
        assert!(!pod.is_expanded());
        assert_eq!(pod.selected(), 0);

        dialog.focus_field(FieldId::Network);
        press(&mut dialog, KeyCode::Enter);
        dialog.set_active_category(8);
        assert!(!dialog.fields().select(FieldId::Network).is_some_and(SelectField::is_expanded));
        assert_eq!(press(&mut dialog, KeyCode::Esc), Some(Action::DialogClose));
    }

    #[test]
    fn test_cancel_button() {
        let mut dialog = dialog();
        dialog.focus_field(FieldId::Timeout);
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Left);
        assert_eq!(press(&mut dialog, KeyCode::Enter), Some(Action::DialogClose));
    }

    #[test]
    fn test_create_button_emits_request_once() {
        let mut dialog = dialog();
        type_text(&mut dialog, "api");
        dialog.focus_field(FieldId::Timeout);
        press(&mut dialog, KeyCode::Tab);
        let Some(Action::ContainerCreate(opts)) = press(&mut dialog, KeyCode::Enter) else {
            panic!("expected a create request");
        };
        assert_eq!(opts.name, "api");
        assert!(!dialog.is_display());
        assert_eq!(press(&mut dialog, KeyCode::Enter), None);
    }

    #[test]
    fn test_display_resets_state() {
        let mut dialog = dialog();
        type_text(&mut dialog, "old");
        dialog.set_active_category(3);
        dialog.display();
        assert_eq!(dialog.active_category(), 0);
        assert_eq!(dialog.field_value(FieldId::Name), Some(FieldValue::Text(String::new())));
    }

    #[test]
    fn test_toggle_instructions() {
        let mut dialog = dialog();
        assert!(dialog.show_instructions);
        dialog
            .handle_key_event(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(!dialog.show_instructions);
        assert_eq!(dialog.field_value(FieldId::Name), Some(FieldValue::Text(String::new())));
    }

    #[test]
    fn test_bracketed_paste() {
        let mut dialog = dialog();
        dialog.focus_field(FieldId::EnvVars);
        dialog
            .handle_events(Some(Event::Paste("A=1 B=2\nignored".into())))
            .unwrap();
        assert_eq!(dialog.container_create_options().env_vars, vec!["A=1", "B=2"]);
    }
}
