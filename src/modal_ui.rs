//! Modal UI rendering functions.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::modals::{ConfirmField, ConfirmState, PickerState, ViewerState};

/// Center a rectangle of the given size within `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Truncate to `max_width` terminal columns, adding an ellipsis when cut.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

/// Pad with spaces to exactly `width` columns so highlights span the row.
fn pad_to(s: String, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::White))
}

fn hint_line(hint: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(hint.into(), Style::default().fg(Color::DarkGray)))
}

/// Draw the menu picker. Updates the scroll offset to keep the selection visible.
pub fn draw_picker(f: &mut Frame, state: &mut PickerState) {
    let area = f.area();
    let modal_width = 76.min(area.width.saturating_sub(2)).max(20);
    let modal_height = 24.min(area.height.saturating_sub(2)).max(8);
    let modal_area = centered_rect(modal_width, modal_height, area);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let inner_width = modal_width.saturating_sub(2) as usize;
    let inner_height = modal_height.saturating_sub(2) as usize;
    // Filter line, blank, then the list; a detail line and the key hints at the bottom.
    let list_height = inner_height.saturating_sub(5).max(1);
    state.ensure_visible(list_height);

    let mut content: Vec<Line> = Vec::new();

    let filter_label_style = if state.filter.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    content.push(Line::from(vec![
        Span::styled("  Filter: ", filter_label_style),
        Span::styled(state.filter.clone(), Style::default().fg(Color::White)),
        Span::styled(" ", Style::default().bg(Color::White)),
    ]));
    content.push(Line::from(""));

    if state.visible.is_empty() {
        content.push(Line::from(Span::styled(
            "  No matching items",
            Style::default().fg(Color::DarkGray),
        )));
        for _ in 1..list_height {
            content.push(Line::from(""));
        }
    } else {
        let visible_start = state.scroll_offset;
        let visible_end = (state.scroll_offset + list_height).min(state.visible.len());

        for row in visible_start..visible_end {
            let item = &state.menu.items[state.visible[row]];
            let is_selected = row == state.selected;

            let label = truncate_str(&item.label, inner_width.saturating_sub(4));
            let remaining = inner_width.saturating_sub(label.width() + 6);
            let description = if remaining > 8 {
                truncate_str(&item.description, remaining)
            } else {
                String::new()
            };

            if is_selected {
                let marker = Style::default().fg(Color::Black).bg(Color::Cyan);
                let text = pad_to(format!("▸ {}  {}", label, description), inner_width - 2);
                content.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(text, marker.add_modifier(Modifier::BOLD)),
                ]));
            } else {
                content.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(label, Style::default().fg(Color::White)),
                    Span::raw("  "),
                    Span::styled(description, Style::default().fg(Color::DarkGray)),
                ]));
            }
        }

        // Fill remaining list space if list is shorter than allocated height
        for _ in (visible_end - visible_start)..list_height {
            content.push(Line::from(""));
        }
    }

    let separator = "─".repeat(inner_width);
    content.push(Line::from(Span::styled(
        separator,
        Style::default().fg(Color::DarkGray),
    )));

    let detail = state
        .selected_index()
        .and_then(|i| state.menu.items[i].detail.as_deref())
        .map(|d| truncate_str(d, inner_width.saturating_sub(2)))
        .unwrap_or_default();
    content.push(Line::from(Span::styled(
        format!("  {}", detail),
        Style::default().fg(Color::Yellow),
    )));

    let count = if state.filter.is_empty() {
        String::new()
    } else {
        format!("{}/{}  ", state.visible.len(), state.menu.items.len())
    };
    content.push(hint_line(format!(
        "  {}↑↓ move  Enter select  type to filter  Esc cancel",
        count
    )));

    let modal = Paragraph::new(content).block(modal_block(&state.menu.title));
    f.render_widget(modal, modal_area);
}

/// Draw the confirm modal.
pub fn draw_confirm(f: &mut Frame, state: &ConfirmState) {
    let area = f.area();
    let modal_width = 64.min(area.width.saturating_sub(2)).max(20);
    let inner_width = modal_width.saturating_sub(6) as usize;

    let mut content: Vec<Line> = Vec::new();
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("  {}", state.request.message),
        Style::default().fg(Color::White),
    )));
    if let Some(detail) = &state.request.detail {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  {}", truncate_str(detail, inner_width)),
            Style::default().fg(Color::DarkGray),
        )));
    }
    content.push(Line::from(""));

    let accept_focused = state.focus == ConfirmField::AcceptButton;
    let accept_style = if accept_focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let reject_style = if accept_focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Black).bg(Color::White)
    };

    let accept = format!(" {} ", state.request.accept);
    let reject = format!(" {} ", state.request.reject);
    let buttons_width = accept.width() + reject.width() + 4;
    let indent = (modal_width.saturating_sub(2) as usize).saturating_sub(buttons_width) / 2;
    content.push(Line::from(vec![
        Span::raw(" ".repeat(indent)),
        Span::styled(accept, accept_style),
        Span::raw("    "),
        Span::styled(reject, reject_style),
    ]));
    content.push(Line::from(""));
    content.push(hint_line("  Tab switch  Enter choose  y/n  Esc cancel"));

    // Message lines may wrap, so leave one spare row.
    let modal_height = (content.len() as u16 + 3).min(area.height);
    let modal_area = centered_rect(modal_width, modal_height, area);
    f.render_widget(Clear, modal_area);

    let modal = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(modal_block(&state.request.title));
    f.render_widget(modal, modal_area);
}

/// Draw the full-screen document viewer. Records the page height for paging keys.
pub fn draw_viewer(f: &mut Frame, state: &mut ViewerState) {
    let area = f.area();
    f.render_widget(Clear, area);

    // Border top and bottom, plus the hint line.
    state.page_height = area.height.saturating_sub(3).max(1) as usize;
    state.scroll_offset = state.scroll_offset.min(state.max_scroll());

    let mut content: Vec<Line> = state
        .lines
        .iter()
        .skip(state.scroll_offset)
        .take(state.page_height)
        .map(|line| {
            let style = if line.starts_with('#') {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(line.clone(), style))
        })
        .collect();

    for _ in content.len()..state.page_height {
        content.push(Line::from(""));
    }

    let position = if state.lines.is_empty() {
        "empty".to_string()
    } else {
        format!(
            "{}-{} of {}",
            state.scroll_offset + 1,
            (state.scroll_offset + state.page_height).min(state.lines.len()),
            state.lines.len()
        )
    };
    content.push(hint_line(format!(
        " {}  ↑↓/jk scroll  PgUp/PgDn page  q close",
        position
    )));

    let modal = Paragraph::new(content).block(modal_block(&state.title));
    f.render_widget(modal, area);
}
