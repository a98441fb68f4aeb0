//! TUI pane rendering modules
//!
//! - [`scene`]: the snapshot of the selected step, drawn by the driver's [`Scene`]
//! - [`steps`]: the recorded step log, indented by recursion level
//! - [`info`]: details of the selected step and the run's outcome
//! - [`status`]: status bar with keybindings and playback state
//!
//! Each pane exports one `render_*` function taking the frame, its area and
//! the data it shows. Scroll offsets live in the app and are clamped here.
//!
//! [`Scene`]: crate::ui::scene::Scene

pub mod info;
pub mod scene;
pub mod status;
pub mod steps;

pub use info::render_info_pane;
pub use scene::render_scene_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use steps::render_steps_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

fn pane_block(title: String, is_focused: bool) -> Block<'static> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows available inside a bordered pane, at least 1
fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Clamp `offset` so the last page stays full
fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}
