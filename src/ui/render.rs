//! UI renderer implementation.
//!
//! Contains the top-level `render` entry point used by the terminal loop and one
//! body renderer per tab kind: the file list (cards or grid), the details inspector,
//! the about/parameter catalog and the settings form.
//!
//! This module should stay mostly “pure rendering”: it reads the session and
//! produces widgets, without owning any session logic.

use crate::app::tab::TabKind;
use crate::app::view::{Card, GridRow, ListEntry, SortState};
use crate::app::{Session, ViewMode};
use crate::app::settings::SettingField;
use crate::core::property::{Align, Column, grid_columns};
use crate::core::stream::StreamKind;
use crate::ui::widgets::{self, Palette};
use crate::utils::shorten_home_path;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Cell, Paragraph, Row, Table, TableState},
};
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

/// Widest a grid or card column gets before its cells are cut.
const MAX_COLUMN_WIDTH: usize = 40;

/// Render function which renders the entire terminal UI for mediascope on each frame.
/// Handles layout, tab bar, the active tab body, footer and overlays.
pub fn render(frame: &mut Frame, session: &mut Session) {
    let palette = Palette::for_mode(session.config().general().display_mode);
    frame.render_widget(Block::default().style(palette.base), frame.area());

    let [tab_area, body, footer] = layout_chunks(frame.area());
    widgets::draw_tab_bar(frame, session, &palette, tab_area);

    match session.workspace().current_tab().clone() {
        TabKind::List => match session.view_mode() {
            ViewMode::Card => render_cards(frame, session, &palette, body),
            ViewMode::Grid => render_grid(frame, session, &palette, body),
        },
        TabKind::Details(file) => render_details(frame, session, &palette, body, &file),
        TabKind::About => render_about(frame, session, &palette, body),
        TabKind::Config => render_settings(frame, session, &palette, body),
    }

    widgets::draw_footer_line(frame, session, &palette, footer);
    widgets::draw_notifications(frame, session, &palette, body);
    widgets::draw_input_dialog(frame, session, &palette);
}

/// Splits the screen into tab bar, body and footer.
pub fn layout_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

// List tab

fn render_empty_list(frame: &mut Frame, palette: &Palette, area: Rect) {
    let text = Text::from(vec![
        Line::raw(""),
        Line::styled("No files", palette.header),
        Line::styled(
            "Press o to open files, d to open a directory, or drop files onto the window.",
            palette.dim,
        ),
    ]);
    frame.render_widget(
        Paragraph::new(text).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn pending_text(loading: bool) -> &'static str {
    if loading {
        "Loading…"
    } else {
        "Not available, press r to retry"
    }
}

fn render_cards(frame: &mut Frame, session: &mut Session, palette: &Palette, area: Rect) {
    if session.cache().is_empty() {
        render_empty_list(frame, palette, area);
        return;
    }
    let selected = session.list_selected();
    let entries = session.card_entries();

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_span = (0, 0);
    for (idx, entry) in entries.iter().enumerate() {
        let start = lines.len();
        let is_selected = idx == selected;
        match entry {
            ListEntry::Ready(card) => card_lines(card, is_selected, palette, &mut lines),
            ListEntry::Pending { file, loading } => {
                lines.push(card_title(file, is_selected, palette));
                lines.push(Line::styled(format!("  {}", pending_text(*loading)), palette.dim));
            }
        }
        lines.push(Line::raw(""));
        if is_selected {
            selected_span = (start, lines.len() - start);
        }
    }
    if entries.is_empty() {
        lines.push(Line::styled("No files match the filter.", palette.dim));
    }

    let scroll = scroll_to_show(selected_span.0, selected_span.1, area.height as usize);
    frame.render_widget(Paragraph::new(lines).scroll((line_offset(scroll), 0)), area);
}

fn card_title<'a>(file: &Path, selected: bool, palette: &Palette) -> Line<'a> {
    let style = if selected {
        palette.selection
    } else {
        palette.header
    };
    Line::from(Span::styled(format!(" {} ", shorten_home_path(file)), style))
}

fn card_lines<'a>(card: &Card, selected: bool, palette: &Palette, lines: &mut Vec<Line<'a>>) {
    let mut title = card_title(&card.file, selected, palette);
    title.push_span(Span::styled(format!("  {}", card.summary), palette.dim));
    lines.push(title);

    for section in &card.sections {
        lines.push(Line::styled(
            format!("  {}", section.kind.name()),
            palette.accent.add_modifier(Modifier::BOLD),
        ));

        let widths: Vec<usize> = section
            .columns
            .iter()
            .enumerate()
            .map(|(col, def)| {
                section
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.width())
                    .chain([def.title().width()])
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect();

        let header = section
            .columns
            .iter()
            .zip(&widths)
            .map(|(def, w)| pad(def.title(), *w, def.align))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(Line::styled(format!("    {}", header), palette.dim));

        for row in &section.rows {
            let text = section
                .columns
                .iter()
                .zip(&widths)
                .zip(row)
                .map(|((def, w), cell)| pad(cell, *w, def.align))
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(Line::styled(format!("    {}", text), palette.base));
        }
    }
}

fn render_grid(frame: &mut Frame, session: &mut Session, palette: &Palette, area: Rect) {
    if session.cache().is_empty() {
        render_empty_list(frame, palette, area);
        return;
    }
    let selected = session.list_selected();
    let cursor = session.sort_cursor();
    let sort = session.sort().clone();
    let columns = grid_columns();
    let entries = session.grid_entries();

    let cells: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| match entry {
            ListEntry::Ready(row) => columns.iter().map(|c| grid_cell(row, c)).collect(),
            ListEntry::Pending { file, loading } => {
                vec![shorten_home_path(file), pending_text(*loading).to_string()]
            }
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(col, c)| {
            cells
                .iter()
                .filter(|row| row.len() == columns.len())
                .filter_map(|row| row.get(col))
                .map(|cell| cell.width())
                .chain([c.def.title().width() + 2, c.kind.name().width()])
                .max()
                .unwrap_or(1)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let visible = visible_columns(&widths, cursor, area.width as usize);
    let header = Row::new(visible.clone().map(|col| {
        let column = &columns[col];
        let first_of_kind = col == 0 || columns[col - 1].kind != column.kind;
        let kind = if first_of_kind { column.kind.name() } else { "" };
        let title = format!("{}{}", column.def.title(), sort_arrow(&sort, column));
        let style = if col == cursor {
            palette.selection
        } else {
            palette.header
        };
        Cell::from(Text::from(vec![
            Line::styled(kind, palette.accent),
            Line::styled(title, style),
        ]))
    }))
    .height(2);

    let rows = cells.iter().map(|row| {
        if row.len() != columns.len() {
            // pending: path and status only
            let mut out = vec![Cell::from(""); visible.len()];
            let mut slots = visible.clone().enumerate();
            if let Some((i, _)) = slots.next() {
                out[i] = Cell::from(row[0].clone());
            }
            if let Some((i, _)) = slots.next() {
                out[i] = Cell::from(Span::styled(row[1].clone(), palette.dim));
            }
            return Row::new(out);
        }
        Row::new(visible.clone().map(|col| {
            let text = pad(&row[col], widths[col], columns[col].def.align);
            Cell::from(text)
        }))
    });

    let constraints: Vec<Constraint> = visible
        .clone()
        .map(|col| Constraint::Length(widths[col] as u16))
        .collect();
    let table = Table::new(rows, constraints)
        .header(header)
        .style(palette.base)
        .column_spacing(2)
        .row_highlight_style(palette.selection);

    let mut state = TableState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn grid_cell(row: &GridRow, column: &Column) -> String {
    let text = row.render(column);
    if column.kind == StreamKind::General && column.def.name == "CompleteName" {
        return shorten_home_path(PathBuf::from(text));
    }
    text
}

fn sort_arrow(sort: &SortState, column: &Column) -> &'static str {
    if sort.column() == Some(column.id().as_str()) {
        sort.direction().arrow()
    } else {
        ""
    }
}

/// Range of columns fitting `width`, starting as far left as possible while showing `cursor`.
pub fn visible_columns(widths: &[usize], cursor: usize, width: usize) -> std::ops::Range<usize> {
    if widths.is_empty() {
        return 0..0;
    }
    let cursor = cursor.min(widths.len() - 1);
    let span = |from: usize, to: usize| -> usize {
        widths[from..=to].iter().sum::<usize>() + 2 * (to - from)
    };

    let mut start = 0;
    while start < cursor && span(start, cursor) > width {
        start += 1;
    }
    let mut end = cursor;
    while end + 1 < widths.len() && span(start, end + 1) <= width {
        end += 1;
    }
    start..end + 1
}

// Details tab

fn render_details(
    frame: &mut Frame,
    session: &mut Session,
    palette: &Palette,
    area: Rect,
    file: &Path,
) {
    let selection = session.selection_for(file);
    let (cursor, scroll) = session
        .details_state(file)
        .map(|s| (s.cursor(), s.scroll()))
        .unwrap_or_default();
    let loaded = session.cache().all_properties(file).is_some();
    let loading = session.cache().is_loading(file);

    let mut lines: Vec<Line> = vec![Line::styled(
        format!(" {} ", shorten_home_path(file)),
        palette.header,
    )];

    let mut chips = vec![Span::styled("Streams: ", palette.dim)];
    for (idx, kind) in selection.available().iter().enumerate() {
        let mark = if selection.is_selected(*kind) { "x" } else { " " };
        let style = if idx == cursor {
            palette.selection
        } else if selection.is_selected(*kind) {
            palette.accent
        } else {
            palette.dim
        };
        chips.push(Span::styled(format!("[{}] {}", mark, kind.name()), style));
        chips.push(Span::raw("  "));
    }
    let all = if selection.can_select_all() { palette.accent } else { palette.dim };
    let none = if selection.can_select_none() { palette.accent } else { palette.dim };
    chips.push(Span::styled("+ all", all));
    chips.push(Span::raw("  "));
    chips.push(Span::styled("- none", none));
    lines.push(Line::from(chips));
    lines.push(Line::raw(""));

    let [head, content] = {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(lines.len() as u16), Constraint::Min(0)])
            .split(area);
        [chunks[0], chunks[1]]
    };
    frame.render_widget(Paragraph::new(lines), head);

    if !loaded {
        let text = if loading { "Loading…" } else { "Properties not available, press r to retry" };
        frame.render_widget(Paragraph::new(Line::styled(text, palette.dim)), content);
        return;
    }

    let groups = session.details_groups(file);
    let mut body: Vec<Line> = Vec::new();
    for group in groups {
        body.push(Line::styled(group.title(), palette.header));
        let key_width = group
            .entries
            .iter()
            .map(|(k, _)| k.width())
            .max()
            .unwrap_or(0)
            .min(MAX_COLUMN_WIDTH);
        for (key, value) in &group.entries {
            body.push(Line::from(vec![
                Span::styled(format!("  {} ", pad(key, key_width, Align::Left)), palette.dim),
                Span::styled(value.clone(), palette.base),
            ]));
        }
        body.push(Line::raw(""));
    }
    if body.is_empty() {
        body.push(Line::styled("Nothing to show.", palette.dim));
    }

    let scroll = scroll.min(body.len().saturating_sub(1));
    frame.render_widget(Paragraph::new(body).scroll((line_offset(scroll), 0)), content);
}

// About tab

fn render_about(frame: &mut Frame, session: &Session, palette: &Palette, area: Rect) {
    let mut lines = vec![Line::styled(" mediascope ", palette.header)];
    match session.about() {
        Some(about) => {
            lines.push(Line::raw(format!("  Version: {}", about.app_version)));
            lines.push(Line::raw(format!(
                "  MediaInfo: {}",
                about.backend_version_number()
            )));
        }
        None => lines.push(Line::styled("  Loading…", palette.dim)),
    }
    lines.push(Line::raw(""));

    let stream = session
        .param_stream()
        .map(|k| k.name())
        .unwrap_or("All");
    lines.push(Line::from(vec![
        Span::styled(" Parameters ", palette.header),
        Span::styled(format!("  Stream: {}", stream), palette.accent),
    ]));

    let [head, table_area, pager_area] = {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(lines.len() as u16),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        [chunks[0], chunks[1], chunks[2]]
    };
    frame.render_widget(Paragraph::new(lines), head);

    if session.parameters().is_none() {
        frame.render_widget(Paragraph::new(Line::styled("  Loading…", palette.dim)), table_area);
        return;
    }

    let filtered = session.filtered_parameters();
    let pager = session.pager();
    let rows = pager.slice(&filtered).iter().map(|p| {
        Row::new(vec![
            Cell::from(p.stream.name()),
            Cell::from(p.property.clone()),
        ])
    });
    let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(10)])
        .header(Row::new(vec!["Stream", "Property"]).style(palette.header))
        .style(palette.base)
        .column_spacing(2);
    frame.render_widget(table, table_area);

    let status = format!(
        " Page {}/{}  ·  {} per page  ·  {} parameters",
        pager.page() + 1,
        pager.page_count(filtered.len()),
        pager.page_size(),
        filtered.len()
    );
    frame.render_widget(Paragraph::new(Line::styled(status, palette.dim)), pager_area);
}

// Settings tab

fn render_settings(frame: &mut Frame, session: &Session, palette: &Palette, area: Rect) {
    let form = session.settings();
    let label_width = SettingField::ALL
        .iter()
        .map(|f| f.label().width())
        .max()
        .unwrap_or(0);

    let mut lines = vec![Line::styled(" Settings ", palette.header), Line::raw("")];
    for (idx, field) in SettingField::ALL.iter().enumerate() {
        let selected = idx == form.selected();
        let style = if selected { palette.selection } else { palette.base };
        let hint = if field.is_text() { "edit" } else { "change" };
        let mut line = Line::from(vec![
            Span::styled(format!("  {} ", pad(field.label(), label_width, Align::Left)), palette.dim),
            Span::styled(form.value_text(*field), style),
        ]);
        if selected {
            line.push_span(Span::styled(format!("   Enter to {}", hint), palette.dim));
        }
        lines.push(line);
    }
    lines.push(Line::raw(""));
    if form.is_dirty() {
        lines.push(Line::styled("  Unsaved changes, press Ctrl+s to save.", palette.accent));
    }
    lines.push(Line::styled(
        format!(
            "  Config file: {}",
            shorten_home_path(crate::config::Config::default_path())
        ),
        palette.dim,
    ));
    frame.render_widget(Paragraph::new(lines), area);
}

// Helpers

/// First line to show so that a block of `len` lines starting at `start` is visible.
pub fn scroll_to_show(start: usize, len: usize, height: usize) -> usize {
    let end = start + len.min(height);
    end.saturating_sub(height)
}

/// Paragraph scroll offset, saturating at the widget's limit.
fn line_offset(line: usize) -> u16 {
    u16::try_from(line).unwrap_or(u16::MAX)
}

/// Pads or cuts `text` to exactly `width` cells.
fn pad(text: &str, width: usize, align: Align) -> String {
    let text = cut_to_width(text, width);
    let fill = width.saturating_sub(text.width());
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(fill)),
        Align::Right => format!("{}{}", " ".repeat(fill), text),
        Align::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}

fn cut_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// render unit tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_keeps_one_line_bars() {
        let [tabs, body, footer] = layout_chunks(Rect::new(0, 0, 80, 24));
        assert_eq!(tabs.height, 1);
        assert_eq!(footer.height, 1);
        assert_eq!(body.height, 22);
    }

    #[test]
    fn visible_columns_follow_the_cursor() {
        let widths = [10, 10, 10, 10];
        assert_eq!(visible_columns(&widths, 0, 22), 0..2);
        assert_eq!(visible_columns(&widths, 3, 22), 2..4);
        assert_eq!(visible_columns(&widths, 1, 100), 0..4);
        assert_eq!(visible_columns(&[], 0, 10), 0..0);
    }

    #[test]
    fn pad_cuts_and_aligns() {
        assert_eq!(pad("abc", 5, Align::Right), "  abc");
        assert_eq!(pad("abc", 5, Align::Center), " abc ");
        assert_eq!(pad("abcdef", 4, Align::Left), "abc…");
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_to_show(0, 5, 10), 0);
        assert_eq!(scroll_to_show(20, 5, 10), 15);
        assert_eq!(scroll_to_show(20, 30, 10), 20);
        assert_eq!(line_offset(70_000), u16::MAX);
        assert_eq!(line_offset(12), 12);
    }
}
