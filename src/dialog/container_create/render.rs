use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Wrap};

use super::{
    BUTTONS, Category, ContainerCreateDialog, DIALOG_MAX_HEIGHT, DIALOG_MAX_WIDTH, DIALOG_TITLE,
    FieldId, FieldKind, FieldWidget, FocusTarget,
};
use crate::components::dialog_layout::{centered_rect, split_dialog_area};
use crate::config::Mode;

const DROPDOWN_MAX_ROWS: u16 = 6;
const TOGGLE_WIDTH: u16 = 3;

impl ContainerCreateDialog {
    fn style(&self, name: &str) -> Style {
        self.config.style(Mode::ContainerCreate, name)
    }

    /// Render the dialog
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_rect(area, DIALOG_MAX_WIDTH, DIALOG_MAX_HEIGHT);
        Clear.render(dialog_area, buf);

        let instructions = self.build_instructions_from_config();
        let layout = split_dialog_area(
            dialog_area,
            self.show_instructions,
            if instructions.is_empty() { None } else { Some(instructions.as_str()) },
        );

        let block = Block::default()
            .title(format!(" {DIALOG_TITLE} "))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.style("border"));
        let inner = block.inner(layout.content_area);
        block.render(layout.content_area, buf);

        let [body, buttons] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

        let category_width = self
            .model
            .categories
            .iter()
            .map(|c| c.label.len() as u16)
            .max()
            .unwrap_or(0)
            + 6;
        let [categories_area, page_area] =
            Layout::horizontal([Constraint::Length(category_width), Constraint::Min(0)]).areas(body);

        self.render_categories(categories_area, buf);
        let dropdown = self.render_page(page_area, buf);
        self.render_buttons(buttons, buf);

        if let Some((field, anchor)) = dropdown {
            self.render_dropdown(field, anchor, inner, buf);
        }

        if self.show_instructions
            && let Some(instructions_area) = layout.instructions_area
        {
            Paragraph::new(instructions)
                .block(Block::default().borders(Borders::ALL).title("Instructions"))
                .style(self.style("instructions"))
                .wrap(Wrap { trim: true })
                .render(instructions_area, buf);
        }
    }

    fn render_categories(&self, area: Rect, buf: &mut Buffer) {
        let list_focused = self.focus.target == FocusTarget::CategoryList;
        for (i, category) in self.model.categories.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.bottom() {
                break;
            }
            let (text, mut style) = if i == self.focus.active_category {
                (format!("-> {} ", category.label), self.style("category_selected"))
            } else {
                (format!("   {} ", category.label), self.style("category"))
            };
            if list_focused && i == self.focus.active_category {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            buf.set_stringn(area.x + 1, y, text, area.width.saturating_sub(1) as usize, style);
        }
    }

    /// Draws the active page. Returns the open dropdown, if any, and the cell
    /// it hangs from so it can be painted over everything else.
    fn render_page(&self, area: Rect, buf: &mut Buffer) -> Option<(FieldId, Rect)> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.style("page_border"));
        let inner = block.inner(area);
        block.render(area, buf);

        let category = self.model.category(self.focus.active_category)?;
        let label_width = category.label_width() as u16 + 1;
        let mut dropdown = None;

        for (row_index, row) in category.rows.iter().enumerate() {
            let y = inner.y + (row_index as u16) * 2;
            if y >= inner.bottom() {
                break;
            }
            let row_area = Rect { y, height: 1, ..inner };
            for (field, cell) in row.iter().zip(row_cells(row, row_area)) {
                let width = if row.len() == 1 {
                    label_width
                } else {
                    field.label().len() as u16 + 1
                };
                if let Some(anchor) = self.render_field(*field, cell, width, buf) {
                    dropdown = Some((*field, anchor));
                }
            }
        }

        if category.fields.contains(&FieldId::Volume) {
            self.render_volume_hint(category, inner, buf);
        }
        dropdown
    }

    fn render_volume_hint(&self, category: &Category, area: Rect, buf: &mut Buffer) {
        let names = self.snapshot.volume_names();
        if names.is_empty() {
            return;
        }
        let y = area.y + (category.rows.len() as u16) * 2;
        if y >= area.bottom() {
            return;
        }
        let hint = format!("available volumes: {}", names.join(", "));
        buf.set_stringn(area.x, y, hint, area.width as usize, self.style("hint"));
    }

    fn render_field(&self, field: FieldId, area: Rect, label_width: u16, buf: &mut Buffer) -> Option<Rect> {
        let focused = self.focused_field() == Some(field);
        buf.set_stringn(area.x, area.y, field.label(), label_width as usize, self.style("label"));
        let widget_area = Rect {
            x: area.x + label_width.min(area.width),
            width: area.width.saturating_sub(label_width + 1),
            ..area
        };

        match self.fields.get(&field)? {
            FieldWidget::Text(text) => {
                let style = if focused { self.style("input_focused") } else { self.style("input") };
                let mut input = text.input.clone();
                input.set_block(Block::default());
                input.set_style(style);
                input.set_cursor_line_style(Style::default());
                if !focused {
                    input.set_cursor_style(style);
                }
                input.render(widget_area, buf);
                None
            }
            FieldWidget::Toggle(toggle) => {
                let mark = if toggle.checked { "[x]" } else { "[ ]" };
                let style = if focused { self.style("input_focused") } else { self.style("input") };
                buf.set_stringn(widget_area.x, widget_area.y, mark, TOGGLE_WIDTH as usize, style);
                None
            }
            FieldWidget::Select(select) => {
                let style = if focused { self.style("input_focused") } else { self.style("input") };
                let label = select.selected_entry().map(|e| e.label.as_str()).unwrap_or("");
                buf.set_style(widget_area, style);
                buf.set_stringn(widget_area.x, widget_area.y, format!("{label} ▼"), widget_area.width as usize, style);
                select.is_expanded().then_some(widget_area)
            }
        }
    }

    fn render_dropdown(&self, field: FieldId, anchor: Rect, bounds: Rect, buf: &mut Buffer) {
        let Some(select) = self.fields.select(field) else {
            return;
        };
        let rows = (select.entries().len() as u16).min(DROPDOWN_MAX_ROWS);
        let below = bounds.bottom().saturating_sub(anchor.y + 1);
        let height = rows.min(below.max(1));
        let y = if below >= rows { anchor.y + 1 } else { anchor.y.saturating_sub(height) };
        let area = Rect {
            x: anchor.x,
            y,
            width: anchor.width.max(10).min(bounds.right().saturating_sub(anchor.x)),
            height,
        };
        Clear.render(area, buf);

        let items: Vec<ListItem> = select
            .entries()
            .iter()
            .map(|entry| ListItem::new(if entry.label.is_empty() { " ".to_string() } else { entry.label.clone() }))
            .collect();
        let list = List::new(items)
            .style(self.style("dropdown"))
            .highlight_style(self.style("dropdown_selected"));
        let mut state = ListState::default().with_selected(Some(select.highlighted()));
        StatefulWidget::render(list, area, buf, &mut state);
    }

    fn render_buttons(&self, area: Rect, buf: &mut Buffer) {
        let mut x = area.right();
        for (i, label) in BUTTONS.iter().enumerate().rev() {
            let text = format!("[ {label} ]");
            x = x.saturating_sub(text.len() as u16 + 1);
            if x < area.x {
                break;
            }
            let style = if self.focus.target == FocusTarget::Button(i) {
                self.style("button_focused")
            } else {
                self.style("button")
            };
            buf.set_string(x, area.y, text, style);
        }
    }
}

/// Split a page row between its fields. A row led by toggles gives them just
/// enough room and the trailing field the rest; other rows split evenly.
fn row_cells(row: &[FieldId], area: Rect) -> Vec<Rect> {
    if row.len() <= 1 {
        return vec![area];
    }
    let (last, leading) = match row.split_last() {
        Some(split) => split,
        None => return vec![area],
    };
    let constraints: Vec<Constraint> = if leading.iter().all(|f| f.kind() == FieldKind::Toggle) {
        leading
            .iter()
            .map(|f| Constraint::Length(f.label().len() as u16 + 1 + TOGGLE_WIDTH + 2))
            .chain(std::iter::once(Constraint::Min(last.label().len() as u16 + 2)))
            .collect()
    } else {
        row.iter().map(|_| Constraint::Ratio(1, row.len() as u32)).collect()
    };
    Layout::horizontal(constraints).split(area).to_vec()
}
