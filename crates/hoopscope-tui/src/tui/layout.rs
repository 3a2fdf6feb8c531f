// Screen layout.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Main Panel (tab content)                          |
// |                                                   |
// +--------------------------------------------------+
// | Notice / API key prompt (1 row)                   |
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Tabs, selection count, credential and analysis status.
    pub status_bar: Rect,
    pub main_panel: Rect,
    pub notice: Rect,
    /// Keyboard shortcut hints for the active tab.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(3),    // main panel
            Constraint::Length(1), // notice
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main_panel: vertical[1],
        notice: vertical[2],
        help_bar: vertical[3],
    }
}

/// Split the Setup tab: selected teams on the left, presets on the right.
pub fn split_setup(area: Rect) -> (Rect, Rect) {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);
    (horizontal[0], horizontal[1])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
