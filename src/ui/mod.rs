//! UI rendering for the chat screen.
//!
//! Layout, top to bottom: transcript, auxiliary status line, input box.
//! The transcript sticks to the bottom (newest entries visible) unless
//! the user has scrolled up.

mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::{Entry, EntryKind, Role};
use theme::{
    COLOR_AGENT, COLOR_BORDER, COLOR_DIM, COLOR_ERROR, COLOR_STATUS, COLOR_TOOL, COLOR_USER,
};

/// Spinner animation frames
const SPINNER_FRAMES: [char; 4] = ['\u{25d0}', '\u{25d3}', '\u{25d1}', '\u{25d2}'];

/// Render the whole chat screen.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_transcript(f, app, chunks[0]);
    render_status_line(f, app, chunks[1]);
    render_input(f, app, chunks[2]);
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(" taskdeck ");
    let inner = block.inner(area);

    let view = app.view();
    let lines: Vec<Line> = view
        .transcript
        .iter()
        .map(|entry| entry_line(entry, app.tick_count))
        .collect();

    // Stick to the bottom unless the user scrolled up.
    let width = inner.width.max(1) as usize;
    let total: usize = view
        .transcript
        .iter()
        .map(|e| estimate_wrapped_lines(&render_text(e), width))
        .sum();
    let overflow = total.saturating_sub(inner.height as usize) as u16;
    let scroll_y = overflow.saturating_sub(app.scroll.min(overflow));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_y, 0));
    f.render_widget(paragraph, area);
}

fn render_status_line(f: &mut Frame, app: &App, area: Rect) {
    let view = app.view();

    let line = if view.is_streaming {
        let frame = SPINNER_FRAMES[(app.tick_count / 2) as usize % SPINNER_FRAMES.len()];
        let status = view.status.unwrap_or("waiting for the planner");
        Line::from(vec![
            Span::styled(format!(" {} ", frame), Style::default().fg(COLOR_STATUS)),
            Span::styled(status.to_string(), Style::default().fg(COLOR_STATUS)),
            Span::styled("  (Esc to cancel)", Style::default().fg(COLOR_DIM)),
        ])
    } else if let Some(error) = view.last_error {
        Line::from(Span::styled(
            format!(" error: {}", error),
            Style::default().fg(COLOR_ERROR),
        ))
    } else {
        Line::from(Span::styled(
            " Enter to send, Ctrl+C to quit",
            Style::default().fg(COLOR_DIM),
        ))
    };

    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let streaming = app.is_streaming();
    let (title, style) = if streaming {
        (" waiting... ", Style::default().fg(COLOR_DIM))
    } else {
        (" your task ", Style::default())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(title);

    let text = if streaming {
        String::new()
    } else {
        format!("{}\u{2588}", app.input)
    };

    f.render_widget(Paragraph::new(text).style(style).block(block), area);
}

/// One rendered line per transcript entry.
fn entry_line(entry: &Entry, tick: u64) -> Line<'_> {
    match (&entry.kind, entry.role) {
        (EntryKind::Typing, _) => {
            // Animated thinking dots in place of the static placeholder text.
            let dots = 1 + (tick / 4) as usize % 3;
            Line::from(Span::styled(
                format!("  {}", ".".repeat(dots)),
                Style::default().fg(COLOR_DIM).add_modifier(Modifier::ITALIC),
            ))
        }
        (EntryKind::ToolProgress { settled, .. }, _) => {
            let marker = if *settled { '\u{2713}' } else { '\u{2699}' };
            Line::from(Span::styled(
                format!("  {} {}", marker, entry.text),
                Style::default().fg(COLOR_TOOL),
            ))
        }
        (_, Role::User) => Line::from(vec![
            Span::styled(
                "you \u{276f} ",
                Style::default().fg(COLOR_USER).add_modifier(Modifier::BOLD),
            ),
            Span::raw(entry.text.as_str()),
        ]),
        (_, Role::Agent) => Line::from(vec![
            Span::styled(
                "agent \u{276f} ",
                Style::default().fg(COLOR_AGENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw(entry.text.as_str()),
        ]),
    }
}

/// Text an entry renders as, for line counting.
fn render_text(entry: &Entry) -> String {
    match entry.kind {
        EntryKind::Typing => "  ...".to_string(),
        EntryKind::ToolProgress { .. } => format!("    {}", entry.text),
        EntryKind::Message => match entry.role {
            Role::User => format!("you > {}", entry.text),
            Role::Agent => format!("agent > {}", entry.text),
        },
    }
}

/// Estimate how many terminal rows a piece of text occupies when
/// wrapped at `width` columns.
fn estimate_wrapped_lines(text: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    text.lines()
        .map(|line| {
            let chars = line.chars().count();
            chars.div_ceil(width).max(1)
        })
        .sum::<usize>()
        .max(1)
}
