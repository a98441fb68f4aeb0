use ratatui::style::Color;

/// Colors shared by every pane and scene
pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange, for compared or touched cells
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub heading: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub selected_bg: Color,
    pub active_call: Color,
    pub outer_call: Color,
    pub bin: Color,
    pub pivot: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    heading: Color::Rgb(137, 180, 250),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),
    selected_bg: Color::Rgb(50, 50, 70), // Selected row in the step list
    active_call: Color::Rgb(249, 226, 175), // Innermost call on the stack
    outer_call: Color::Rgb(180, 165, 120),
    bin: Color::Rgb(148, 226, 213), // Counting, bucket and radix bins
    pivot: Color::Rgb(245, 194, 231), // Pivots and solution paths
};
