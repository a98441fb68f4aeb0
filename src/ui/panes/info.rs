//! Details of the selected step

use super::pane_block;
use crate::engine::RunState;
use crate::ui::scene::Scene;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph, Wrap},
    Frame,
};

fn field(name: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", name), Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(value, Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

pub fn render_info_pane<V: Scene>(
    frame: &mut Frame,
    area: Rect,
    state: &RunState<V>,
    selected: Option<usize>,
    is_focused: bool,
) {
    let block = pane_block(" Step ".to_string(), is_focused).padding(Padding::new(1, 0, 0, 0));
    let mut lines = Vec::new();

    if let Some(step) = selected.and_then(|id| state.log.get(id)) {
        lines.push(Line::from(Span::styled(
            step.description.clone(),
            Style::default()
                .fg(DEFAULT_THEME.active_call)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(field("kind", V::kind_label(step.kind).to_string()));
        lines.push(field("level", step.level.to_string()));
        if let Some(parent) = step.parent {
            lines.push(field("parent", format!("#{}", parent)));
        }
        if !step.children.is_empty() {
            let children: Vec<String> = step.children.iter().map(|c| format!("#{}", c)).collect();
            lines.push(field("children", children.join(" ")));
        }
        if let Some(status) = step.status {
            lines.push(field("status", status.label().to_string()));
        }
        if let Some(result) = &step.result {
            lines.push(field("returned", format!("{:?}", result)));
        }
    }

    if state.is_complete {
        lines.push(Line::raw(""));
        let outcome = match &state.solution {
            Some(solution) => V::summarize(solution),
            None => state.message.clone(),
        };
        lines.push(Line::from(Span::styled(
            outcome,
            Style::default()
                .fg(DEFAULT_THEME.success)
                .add_modifier(Modifier::BOLD),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
