//! Status bar rendering with keybindings and state indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// What the status bar reports about the run and the replay cursor
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// Selected step, `None` before the first step
    pub current_step: Option<usize>,
    pub total_steps: usize,
    /// Whether the cursor follows the newest step
    pub is_live: bool,
    pub is_playing: bool,
    pub is_complete: bool,
    pub delay: Duration,
}

/// Key and action, in display order
const KEYBINDS: [(&str, &str); 6] = [
    ("←/→", "step"),
    ("⎵", "play"),
    ("↵/⌫", "live/start"),
    ("+/-", "speed"),
    ("c", "cancel"),
    ("q", "quit"),
];

fn badge(text: &'static str, color: Color) -> Span<'static> {
    Span::styled(
        text,
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData) {
    // Split status bar into left and right
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Left side: Step info and status
    let step_text = match data.current_step {
        Some(step) => format!(" Step {}/{} ", step + 1, data.total_steps),
        None => " Step -/- ".to_string(),
    };

    let left_spans = vec![
        Span::styled(
            step_text,
            Style::default()
                .bg(if data.is_complete {
                    DEFAULT_THEME.success
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}ms ", data.delay.as_millis()),
            Style::default()
                .bg(DEFAULT_THEME.selected_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.selected_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.selected_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.selected_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.selected_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.selected_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::with_capacity(KEYBINDS.len() * 3 + 2);
    for (i, (key, action)) in KEYBINDS.iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", action), desc_style));
    }

    let is_at_start = data.current_step == Some(0) && data.total_steps > 1;

    right_spans.push(Span::styled("│", sep_style));
    if data.is_playing {
        right_spans.push(badge(" ▶ PLAYING ", DEFAULT_THEME.secondary));
    } else if data.is_live && !data.is_complete {
        right_spans.push(badge(" ● LIVE ", DEFAULT_THEME.error));
    } else if data.is_live {
        right_spans.push(badge(" END ", DEFAULT_THEME.error));
    } else if is_at_start {
        right_spans.push(badge(" START ", DEFAULT_THEME.success));
    } else {
        right_spans.push(badge(" REPLAY ", DEFAULT_THEME.primary));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.selected_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
