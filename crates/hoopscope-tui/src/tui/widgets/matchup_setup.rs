// Setup tab: per-team season and game window, plus the preset ranges for the
// focused team.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use hoopscope_core::matchup::{TeamAnalysisConfig, MIN_TEAMS};
use hoopscope_core::season::{common_ranges, season_display};

use crate::tui::layout::split_setup;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let configs = state.selection.configs();
    if configs.is_empty() {
        let paragraph = Paragraph::new("No teams picked yet. Pick teams on the Teams tab (1).")
            .block(Block::default().borders(Borders::ALL).title("Matchup"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let (left, right) = split_setup(area);
    let cursor = state.setup_cursor.min(configs.len() - 1);

    let items: Vec<ListItem> = configs.iter().map(config_item).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(matchup_title(configs.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(cursor));
    frame.render_stateful_widget(list, left, &mut list_state);

    render_presets(frame, right, &configs[cursor], state.preset_cursor);
}

fn matchup_title(count: usize) -> String {
    if count < MIN_TEAMS {
        format!("Matchup ({count}) - pick at least {MIN_TEAMS}")
    } else {
        format!("Matchup ({count})")
    }
}

/// One row: team, season, window and its display label.
pub fn config_line(config: &TeamAnalysisConfig) -> String {
    format!(
        "{}  {}  games {}-{} of {}  ({})",
        config.team().full_name,
        season_display(config.season()),
        config.start_game(),
        config.end_game(),
        config.max_games(),
        config.game_range_display()
    )
}

fn config_item(config: &TeamAnalysisConfig) -> ListItem<'static> {
    ListItem::new(Line::from(config_line(config)))
}

fn render_presets(frame: &mut Frame, area: Rect, config: &TeamAnalysisConfig, next: usize) {
    let presets = common_ranges(config.season());
    let next = next % presets.len();

    let lines: Vec<Line> = presets
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let active =
                preset.start_game == config.start_game() && preset.end_game == config.end_game();
            let marker = if i == next { "p> " } else { "   " };
            let style = if active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:<15} {}-{}", preset.label, preset.start_game, preset.end_game),
                    style,
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Presets - {}", config.team().name)),
    );
    frame.render_widget(paragraph, area);
}
