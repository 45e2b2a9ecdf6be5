use ratatui::prelude::Rect;

/// Helper for dialog layout with optional instructions area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogLayout {
    pub content_area: Rect,
    pub instructions_area: Option<Rect>,
}

/// Split a dialog into its content and a bottom instructions box sized to the
/// wrapped instruction text.
pub fn split_dialog_area(
    area: Rect,
    show_instructions: bool,
    instructions: Option<&str>,
) -> DialogLayout {
    let Some(instructions) = instructions.filter(|_| show_instructions) else {
        return DialogLayout {
            content_area: area,
            instructions_area: None,
        };
    };
    let wrap_width = area.width.saturating_sub(4).max(10) as usize;
    let wrapped_lines = textwrap::wrap(instructions, wrap_width);
    let instructions_height = ((wrapped_lines.len() as u16).max(1) + 2).min(area.height);
    let content_area = Rect {
        height: area.height.saturating_sub(instructions_height),
        ..area
    };
    let instructions_area = Rect {
        y: area.y + content_area.height,
        height: instructions_height,
        ..area
    };
    DialogLayout {
        content_area,
        instructions_area: Some(instructions_area),
    }
}

/// Center a box of at most `max_width` x `max_height` inside `area`.
pub fn centered_rect(area: Rect, max_width: u16, max_height: u16) -> Rect {
    let width = area.width.min(max_width);
    let height = area.height.min(max_height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
