// Team picker: the 30-team catalog filtered by the search query, with picked
// teams marked.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use hoopscope_core::teams::Team;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let teams = state.visible_teams();
    let items: Vec<ListItem> = teams.iter().map(|&t| team_item(t, state)).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title(state, teams.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !teams.is_empty() {
        list_state.select(Some(state.team_cursor.min(teams.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn title(state: &ViewState, shown: usize) -> String {
    let season = state.default_season;
    if state.search_query.is_empty() && !state.search_mode {
        format!("Teams ({shown}) - new picks use {}-{season}", season - 1)
    } else {
        format!("Teams matching \"{}\" ({shown})", state.search_query)
    }
}

fn team_item(team: &'static Team, state: &ViewState) -> ListItem<'static> {
    let picked = state.selection.contains(team);
    let marker = if picked { "[x] " } else { "[ ] " };
    let style = if picked {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, style),
        Span::styled(format!("{:<4}", team.id), Style::default().fg(Color::DarkGray)),
        Span::styled(team.display_name(), style),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoopscope_core::teams::find_team;

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(70, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..12)
            .map(|y| (0..70).map(|x| buffer[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn picked_teams_are_marked() {
        let mut state = ViewState::new(2024, 20, 2025);
        state.selection.toggle(find_team("ATL").unwrap(), 2024, 20);
        let screen = draw(&state);
        assert!(screen.contains("[x] ATL Atlanta Hawks"));
        assert!(screen.contains("[ ] BOS Boston Celtics"));
    }

    #[test]
    fn title_reflects_search() {
        let mut state = ViewState::new(2024, 20, 2025);
        state.search_query = "los".into();
        let screen = draw(&state);
        assert!(screen.contains("Teams matching \"los\" (2)"));
    }

    #[test]
    fn empty_search_result_renders() {
        let mut state = ViewState::new(2024, 20, 2025);
        state.search_query = "zzz".into();
        state.team_cursor = 5;
        let screen = draw(&state);
        assert!(screen.contains("(0)"));
    }
}
