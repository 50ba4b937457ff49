//! Draw widget module which holds the chrome around the tab content.
//!
//! Relies on helpers and data structs from [crate::ui::widgets].
//!
//! Used by ui::render to draw the tab bar, the footer line, the prompt dialog
//! and the notification stack.

use crate::app::Session;
use crate::app::actions::{ActionMode, InputMode};
use crate::app::tab::TabKind;
use crate::ui::overlays::Severity;
use crate::ui::widgets::{
    DialogLayout, DialogPosition, DialogSize, DialogStyle, Palette, dialog_area, draw_dialog,
};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{BorderType, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Draws the tab bar: one label per tab, the active one highlighted.
pub fn draw_tab_bar(frame: &mut Frame, session: &Session, palette: &Palette, area: Rect) {
    let workspace = session.workspace();
    let mut spans = Vec::new();
    for (idx, tab) in workspace.tabs().iter().enumerate() {
        let label = format!(" {}:{} ", idx + 1, tab.label());
        let style = if idx == workspace.current() {
            palette.selection
        } else {
            palette.accent
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::styled(" ", palette.base));
    }
    let paragraph = Paragraph::new(Line::from(spans)).style(palette.base);
    frame.render_widget(paragraph, area);
}

/// Draws the footer: key hints of the active tab on the left, the applied filter on the right.
pub fn draw_footer_line(frame: &mut Frame, session: &Session, palette: &Palette, area: Rect) {
    let hints = match session.workspace().current_tab() {
        TabKind::List => "o open  O append  d dir  Enter details  v view  s sort  / filter  e json  r retry  x remove  q quit",
        TabKind::Details(_) => "←/→ stream  space toggle  +/- all/none  / filter  e json  r retry  Ctrl+w close",
        TabKind::About => "n/p page  z page size  t stream  / filter  Ctrl+w close",
        TabKind::Config => "↑/↓ field  Enter edit  Ctrl+s save  Ctrl+w close",
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(hints, palette.dim))).style(palette.base),
        area,
    );

    let mut parts = Vec::new();
    if let Some(query) = session.active_query()
        && !query.applied().is_empty()
    {
        parts.push(format!("Filter: \"{}\"", query.applied()));
    }
    if matches!(session.workspace().current_tab(), TabKind::Config) && session.settings().is_dirty()
    {
        parts.push("modified".to_string());
    }
    let msg = parts.join(" | ");
    if !msg.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(msg, palette.accent)))
            .alignment(Alignment::Right);
        frame.render_widget(paragraph, area);
    }
}

/// Draws the prompt dialog of the current input mode with its cursor.
pub fn draw_input_dialog(frame: &mut Frame, session: &Session, palette: &Palette) {
    let ActionMode::Input { mode, prompt } = session.actions().mode() else {
        return;
    };
    let size = match mode {
        InputMode::Filter => DialogSize::Small,
        InputMode::AddPaths { .. } | InputMode::EditSetting(_) => DialogSize::Custom(
            (frame.area().width as u32 * 70 / 100).max(30) as u16,
            3,
        ),
    };
    let position = DialogPosition::Center;
    let rect = dialog_area(frame.area(), size, position);
    let visible_width = rect.width.saturating_sub(2) as usize;

    let input_text = session.actions().input_buffer();
    let cursor_pos = session.actions().input_cursor_pos();
    let (display_input, cursor_offset) = input_field_view(input_text, cursor_pos, visible_width);

    let style = DialogStyle {
        border: Borders::ALL,
        border_style: palette.accent,
        bg: palette.base,
        title: Some(Span::styled(
            format!(" {} ", prompt),
            palette.header,
        )),
    };
    draw_dialog(
        frame,
        DialogLayout {
            area: frame.area(),
            position,
            size,
        },
        BorderType::Rounded,
        &style,
        display_input,
        Some(Alignment::Left),
    );
    frame.set_cursor_position((rect.x + 1 + cursor_offset as u16, rect.y + 1));
}

/// Draws the notifications stacked upwards from the bottom right corner, newest lowest.
pub fn draw_notifications(frame: &mut Frame, session: &Session, palette: &Palette, area: Rect) {
    let mut bottom = area.y + area.height;
    let notes: Vec<_> = session.notifications().collect();

    for (title, severity) in notes.into_iter().rev() {
        let (label, color) = match severity {
            Severity::Info => (" Info ", palette.info),
            Severity::Error => (" Error ", palette.error),
        };
        let max_width = area.width.saturating_sub(2).max(1) as usize;
        let text_width = title.width().max(24).min(max_width.saturating_sub(4).max(1));
        let width = (text_width + 4).min(area.width as usize) as u16;
        let lines = title.width().div_ceil(text_width.max(1)).max(1);
        let height = (lines + 2) as u16;
        if bottom < area.y + height {
            break;
        }

        let stack_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: bottom - area.y,
        };
        let style = DialogStyle {
            border: Borders::ALL,
            border_style: color,
            bg: palette.base,
            title: Some(Span::styled(label, color.add_modifier(Modifier::BOLD))),
        };
        draw_dialog(
            frame,
            DialogLayout {
                area: stack_area,
                position: DialogPosition::BottomRight,
                size: DialogSize::Custom(width, height),
            },
            BorderType::Rounded,
            &style,
            title.to_string(),
            Some(Alignment::Left),
        );
        bottom -= height;
    }
}

/// Helper function to calculate cursor offset for cursor moving
/// Handles horizontal truncation, variable width with unicode_width and clamps cursor to buffer.
/// Is used for draw widgets/dialogs with input fields.
fn input_field_view(input_text: &str, cursor_pos: usize, visible_width: usize) -> (&str, usize) {
    let cursor_pos = cursor_pos.min(input_text.len());
    let input_width = input_text.width();
    if input_width < visible_width {
        return (input_text, input_text[..cursor_pos].width());
    }

    // keep the tail visible, leaving a cell for the cursor
    let mut current_w = 0;
    let mut start = 0;
    for (idx, ch) in input_text.char_indices().rev() {
        current_w += ch.width().unwrap_or(0);
        if current_w >= visible_width {
            start = idx + ch.len_utf8();
            break;
        }
    }

    let cursor_offset = if cursor_pos < start {
        0
    } else {
        input_text[start..cursor_pos].width()
    };
    (&input_text[start..], cursor_offset)
}
