//! Widget helpers for the renderer.
//!
//! Holds the dialog geometry ([DialogSize], [DialogPosition], [dialog_area]), the shared
//! [draw_dialog] routine and the [Palette] derived from the configured display mode.
//! The actual draw functions live in [draw].

pub mod draw;

pub use draw::{draw_footer_line, draw_input_dialog, draw_notifications, draw_tab_bar};

use crate::config::DisplayMode;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

/// Dialog sizes as percentage presets or exact cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSize {
    Small,
    Medium,
    Large,
    Custom(u16, u16),
}

impl DialogSize {
    fn cells(&self, area: Rect) -> (u16, u16) {
        let pct = |w: u16, h: u16| {
            (
                (area.width as u32 * w as u32 / 100) as u16,
                (area.height as u32 * h as u32 / 100) as u16,
            )
        };
        let (w, h) = match *self {
            DialogSize::Small => {
                let (w, _) = pct(50, 0);
                (w.max(30), 3)
            }
            DialogSize::Medium => pct(60, 40),
            DialogSize::Large => pct(80, 70),
            DialogSize::Custom(w, h) => (w, h),
        };
        (w.min(area.width), h.min(area.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPosition {
    Center,
    TopRight,
    BottomRight,
    BottomLeft,
}

pub struct DialogStyle<'a> {
    pub border: Borders,
    pub border_style: Style,
    pub bg: Style,
    pub title: Option<Span<'a>>,
}

pub struct DialogLayout {
    pub area: Rect,
    pub position: DialogPosition,
    pub size: DialogSize,
}

/// Rectangle of a dialog of `size` placed at `position` inside `area`.
pub fn dialog_area(area: Rect, size: DialogSize, position: DialogPosition) -> Rect {
    let (width, height) = size.cells(area);
    let (x, y) = match position {
        DialogPosition::Center => (
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
        ),
        DialogPosition::TopRight => (area.x + area.width - width, area.y),
        DialogPosition::BottomRight => (
            area.x + area.width - width,
            area.y + area.height - height,
        ),
        DialogPosition::BottomLeft => (area.x, area.y + area.height - height),
    };
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Clears the dialog rectangle and draws a bordered paragraph into it.
pub fn draw_dialog<'a, T>(
    frame: &mut Frame,
    layout: DialogLayout,
    border_type: BorderType,
    style: &DialogStyle<'a>,
    text: T,
    alignment: Option<Alignment>,
) where
    T: Into<Text<'a>>,
{
    let rect = dialog_area(layout.area, layout.size, layout.position);
    frame.render_widget(Clear, rect);

    let mut block = Block::default()
        .borders(style.border)
        .border_type(border_type)
        .border_style(style.border_style)
        .style(style.bg);
    if let Some(title) = &style.title {
        block = block.title(title.clone());
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .alignment(alignment.unwrap_or(Alignment::Left));
    frame.render_widget(paragraph, rect);
}

/// Colors of the whole UI for one display mode.
///
/// `Auto` keeps the terminal's own colors and only adds accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: Style,
    pub accent: Style,
    pub dim: Style,
    pub header: Style,
    pub selection: Style,
    pub info: Style,
    pub error: Style,
}

impl Palette {
    pub fn for_mode(mode: DisplayMode) -> Self {
        let (fg, bg, accent, dim) = match mode {
            DisplayMode::Auto => (Color::Reset, Color::Reset, Color::Cyan, Color::DarkGray),
            DisplayMode::Light => (Color::Black, Color::White, Color::Blue, Color::Gray),
            DisplayMode::Dark => (
                Color::Gray,
                Color::Rgb(24, 24, 28),
                Color::LightCyan,
                Color::DarkGray,
            ),
        };
        let base = Style::default().fg(fg).bg(bg);
        Self {
            base,
            accent: base.fg(accent),
            dim: base.fg(dim),
            header: base.fg(accent).add_modifier(Modifier::BOLD),
            selection: Style::default()
                .fg(bg_or(bg, Color::Black))
                .bg(accent)
                .add_modifier(Modifier::BOLD),
            info: base.fg(Color::Green),
            error: base.fg(Color::Red),
        }
    }
}

fn bg_or(bg: Color, fallback: Color) -> Color {
    if bg == Color::Reset { fallback } else { bg }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialogs_stay_inside_the_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = dialog_area(area, DialogSize::Custom(60, 20), DialogPosition::BottomRight);
        assert_eq!(rect, area);

        let rect = dialog_area(area, DialogSize::Small, DialogPosition::Center);
        assert_eq!((rect.width, rect.height), (30, 3));
        assert_eq!((rect.x, rect.y), (5, 3));
    }

    #[test]
    fn auto_mode_keeps_terminal_colors() {
        let palette = Palette::for_mode(DisplayMode::Auto);
        assert_eq!(palette.base, Style::default().fg(Color::Reset).bg(Color::Reset));
        assert_ne!(Palette::for_mode(DisplayMode::Light), palette);
    }
}
