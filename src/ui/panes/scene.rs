//! Scene pane: the selected step's snapshot

use super::{clamp_scroll, pane_block, visible_height};
use crate::ui::scene::Scene;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Padding, Paragraph},
    Frame,
};

/// Render `snapshot`, or a placeholder before the first step
pub fn render_scene_pane<V: Scene>(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&V::Snapshot>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(format!(" {} ", V::TITLE), is_focused);

    let Some(snapshot) = snapshot else {
        let paragraph = Paragraph::new("(no steps recorded yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let lines: Vec<Line> = V::draw(snapshot);
    clamp_scroll(scroll_offset, lines.len(), visible_height(area));

    let paragraph = Paragraph::new(lines)
        .block(block.padding(Padding::new(1, 0, 0, 0)))
        .scroll((u16::try_from(*scroll_offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}
