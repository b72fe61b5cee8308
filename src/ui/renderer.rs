//! Frame composition for the chat screen.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::core::assistant::ErrorKind;
use crate::core::store::StoreSnapshot;
use crate::ui::chat_loop::ChatUi;

/// Shown in the transcript while a response is outstanding.
pub const PENDING_INDICATOR: &str = "⚡ Charging Spirit Energy...";

pub fn build_display_lines<'a>(snapshot: &'a StoreSnapshot) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    for msg in &snapshot.messages {
        if msg.is_user() {
            // User messages: cyan with a "You:" prefix and timestamp
            let mut first = true;
            for content_line in msg.text.lines() {
                if first {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("[{}] ", msg.timestamp.format("%H:%M")),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(
                            "You: ",
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(content_line, Style::default().fg(Color::Cyan)),
                    ]));
                    first = false;
                } else {
                    lines.push(Line::from(Span::styled(
                        content_line,
                        Style::default().fg(Color::Cyan),
                    )));
                }
            }
            lines.push(Line::from(""));
        } else {
            // Assistant messages: no prefix, default color
            for content_line in msg.text.lines() {
                if content_line.trim().is_empty() {
                    lines.push(Line::from(""));
                } else {
                    lines.push(Line::from(Span::styled(
                        content_line,
                        Style::default().fg(Color::White),
                    )));
                }
            }
            lines.push(Line::from(""));
        }
    }

    if snapshot.pending {
        lines.push(Line::from(Span::styled(
            PENDING_INDICATOR,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    if let Some(error) = &snapshot.last_error {
        let prefix = match error.kind {
            ErrorKind::Configuration => "🔑 ",
            _ => "⚠️ ",
        };
        lines.push(Line::from(vec![
            Span::styled(prefix, Style::default().fg(Color::Red)),
            Span::styled(
                error.message.as_str(),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
    }

    lines
}

pub fn line_count(snapshot: &StoreSnapshot) -> u16 {
    build_display_lines(snapshot).len() as u16
}

pub fn draw(f: &mut Frame, snapshot: &StoreSnapshot, ui: &ChatUi) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let lines = build_display_lines(snapshot);

    let available_height = chunks[0].height.saturating_sub(1); // title row
    let total_lines = lines.len() as u16;
    let max_offset = total_lines.saturating_sub(available_height);
    let scroll_offset = if ui.auto_scroll {
        max_offset
    } else {
        ui.scroll_offset.min(max_offset)
    };

    let transcript = Paragraph::new(lines)
        .block(Block::default().title(ui.title.as_str()))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, chunks[0]);

    let input_title = if snapshot.pending {
        "Waiting for the spirit... (Ctrl+C to quit)"
    } else {
        "Type your message (Enter to send, Ctrl+C to quit)"
    };

    let input = Paragraph::new(ui.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(input_title))
        .wrap(Wrap { trim: true });
    f.render_widget(input, chunks[1]);

    f.set_cursor_position((
        chunks[1].x + ui.input.width() as u16 + 1,
        chunks[1].y + 1,
    ));
}
