//! Step log pane
//!
//! One row per recorded step. Rows are indented by level, so recursive and
//! backtracking runs read as a call tree. The selected step is kept on screen.

use super::{clamp_scroll, pane_block, visible_height};
use crate::engine::{CallStatus, StepLog};
use crate::ui::scene::Scene;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

fn status_marker(status: Option<CallStatus>) -> Span<'static> {
    let (text, color) = match status {
        None => ("  ", DEFAULT_THEME.comment),
        Some(CallStatus::Pending) => ("… ", DEFAULT_THEME.comment),
        Some(CallStatus::Active) => ("▶ ", DEFAULT_THEME.active_call),
        Some(CallStatus::Returning) => ("↩ ", DEFAULT_THEME.secondary),
        Some(CallStatus::Complete) => ("✓ ", DEFAULT_THEME.success),
    };
    Span::styled(text, Style::default().fg(color))
}

pub fn render_steps_pane<V: Scene>(
    frame: &mut Frame,
    area: Rect,
    log: &StepLog<V>,
    selected: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(format!(" Steps ({}) ", log.len()), is_focused);

    if log.is_empty() {
        let paragraph = Paragraph::new("(waiting for the first step)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = visible_height(area);
    // Keep the selected row inside the window
    if let Some(selected) = selected {
        if selected < *scroll_offset {
            *scroll_offset = selected;
        } else if selected >= *scroll_offset + visible {
            *scroll_offset = selected + 1 - visible;
        }
    }
    clamp_scroll(scroll_offset, log.len(), visible);

    let items: Vec<ListItem> = log
        .iter()
        .skip(*scroll_offset)
        .take(visible)
        .map(|step| {
            let is_selected = selected == Some(step.id);
            let base = if is_selected {
                Style::default()
                    .bg(DEFAULT_THEME.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::styled(format!("{:>4} ", step.id), base.fg(DEFAULT_THEME.comment)),
                Span::raw("  ".repeat(step.level)),
                status_marker(step.status),
                Span::styled(
                    format!("{:<10}", V::kind_label(step.kind)),
                    base.fg(DEFAULT_THEME.heading),
                ),
                Span::styled(step.description.clone(), base.fg(DEFAULT_THEME.fg)),
            ]);
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
