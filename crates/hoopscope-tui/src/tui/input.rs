// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into `UserCommand`s for the app loop, or
// into local `ViewState` edits (team picks, seasons, game windows, scrolling).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use hoopscope_app::protocol::{AnalysisStatus, UserCommand};
use hoopscope_core::season::common_ranges;
use hoopscope_llm::prompt::PromptVariant;

use super::{Tab, ViewState};

const PAGE: u16 = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app loop; `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if state.key_entry.is_some() {
        return handle_key_entry(key_event, state);
    }

    if state.search_mode {
        handle_search(key_event, state);
        return None;
    }

    match key_event.code {
        KeyCode::Char('1') => switch_tab(state, Tab::Teams),
        KeyCode::Char('2') => switch_tab(state, Tab::Setup),
        KeyCode::Char('3') => switch_tab(state, Tab::Prompt),
        KeyCode::Char('4') => switch_tab(state, Tab::Analysis),
        KeyCode::Tab => switch_tab(state, state.active_tab.next()),

        KeyCode::Char('q') => return Some(UserCommand::Quit),
        KeyCode::Char('a') => {
            state.key_entry = Some(String::new());
            state.notice = None;
        }
        KeyCode::Char('v') => {
            state.variant = match state.variant {
                PromptVariant::Full => PromptVariant::Quick,
                PromptVariant::Quick => PromptVariant::Full,
            };
        }
        KeyCode::Char('g') => return request_analysis(state),
        KeyCode::Char('r') => {
            if state.last_matchup.is_some() {
                state.active_tab = Tab::Analysis;
                return Some(UserCommand::Retry);
            }
            state.notice = Some("Nothing to retry yet.".into());
        }
        KeyCode::Char('x') => {
            if state.analysis_status == AnalysisStatus::Loading {
                return Some(UserCommand::Cancel);
            }
        }

        _ => match state.active_tab {
            Tab::Teams => handle_teams_key(key_event.code, state),
            Tab::Setup => handle_setup_key(key_event.code, state),
            Tab::Prompt | Tab::Analysis => handle_scroll_key(key_event.code, state),
        },
    }
    None
}

fn switch_tab(state: &mut ViewState, tab: Tab) {
    state.active_tab = tab;
    state.scroll = 0;
}

/// Snapshot the selection and ask the app loop to analyze it.
fn request_analysis(state: &mut ViewState) -> Option<UserCommand> {
    match state.selection.to_matchup() {
        Ok(matchup) => {
            state.active_tab = Tab::Analysis;
            state.notice = None;
            Some(UserCommand::Analyze {
                matchup,
                variant: state.variant,
            })
        }
        Err(e) => {
            state.notice = Some(e.to_string());
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Modal input
// ---------------------------------------------------------------------------

/// The API key prompt stays open until the app loop confirms the save.
fn handle_key_entry(key_event: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(c) => {
            if let Some(entry) = state.key_entry.as_mut() {
                entry.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(entry) = state.key_entry.as_mut() {
                entry.pop();
            }
        }
        KeyCode::Esc => {
            state.key_entry = None;
            state.notice = None;
        }
        KeyCode::Enter => return state.key_entry.clone().map(UserCommand::SaveApiKey),
        _ => {}
    }
    None
}

fn handle_search(key_event: KeyEvent, state: &mut ViewState) {
    match key_event.code {
        KeyCode::Char(c) => {
            state.search_query.push(c);
            state.team_cursor = 0;
        }
        KeyCode::Backspace => {
            state.search_query.pop();
            state.team_cursor = 0;
        }
        KeyCode::Enter => state.search_mode = false,
        KeyCode::Esc => {
            state.search_mode = false;
            state.search_query.clear();
            state.team_cursor = 0;
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Per-tab keys
// ---------------------------------------------------------------------------

fn handle_teams_key(code: KeyCode, state: &mut ViewState) {
    let visible = state.visible_teams();
    match code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.team_cursor = state.team_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.team_cursor + 1 < visible.len() {
                state.team_cursor += 1;
            }
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(team) = visible.get(state.team_cursor).copied() {
                if !state.selection.toggle(team, state.default_season, state.default_games) {
                    state.notice = Some("You can compare at most 4 teams.".into());
                }
            }
        }
        KeyCode::Char('/') => state.search_mode = true,
        KeyCode::Char('c') => {
            state.selection.clear();
            state.setup_cursor = 0;
        }
        KeyCode::Esc => {
            state.search_query.clear();
            state.team_cursor = 0;
        }
        _ => {}
    }
}

fn handle_setup_key(code: KeyCode, state: &mut ViewState) {
    let len = state.selection.len();
    if len == 0 {
        return;
    }
    state.setup_cursor = state.setup_cursor.min(len - 1);

    match code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.setup_cursor = state.setup_cursor.saturating_sub(1);
            state.preset_cursor = 0;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.setup_cursor = (state.setup_cursor + 1).min(len - 1);
            state.preset_cursor = 0;
        }
        // Seasons are listed newest first: Left steps back in time.
        KeyCode::Left | KeyCode::Char('h') => step_season(state, 1),
        KeyCode::Right | KeyCode::Char('l') => step_season(state, -1),
        KeyCode::Char('p') => apply_next_preset(state),
        KeyCode::Char('[') => nudge_range(state, -1, 0),
        KeyCode::Char(']') => nudge_range(state, 1, 0),
        KeyCode::Char('{') => nudge_range(state, 0, -1),
        KeyCode::Char('}') => nudge_range(state, 0, 1),
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(team) = state.selection.configs().get(state.setup_cursor).map(|c| c.team()) {
                state.selection.toggle(team, state.default_season, state.default_games);
                state.setup_cursor = state.setup_cursor.min(state.selection.len().saturating_sub(1));
            }
        }
        _ => {}
    }
}

fn step_season(state: &mut ViewState, delta: isize) {
    let cursor = state.setup_cursor;
    let Some(current) = state.selection.configs().get(cursor).map(|c| c.season()) else {
        return;
    };
    let idx = state.seasons.iter().position(|s| *s == current).unwrap_or(0);
    let Some(next_idx) = idx.checked_add_signed(delta) else {
        return;
    };
    if let Some(&season) = state.seasons.get(next_idx) {
        if let Some(config) = state.selection.config_mut(cursor) {
            config.set_season(season);
        }
        state.preset_cursor = 0;
    }
}

fn apply_next_preset(state: &mut ViewState) {
    let cursor = state.setup_cursor;
    let preset_cursor = state.preset_cursor;
    if let Some(config) = state.selection.config_mut(cursor) {
        let presets = common_ranges(config.season());
        let preset = &presets[preset_cursor % presets.len()];
        config.apply_preset(preset);
        state.notice = Some(format!("{}: {}", config.team().name, preset.label));
        state.preset_cursor = (preset_cursor + 1) % presets.len();
    }
}

fn nudge_range(state: &mut ViewState, start_delta: i32, end_delta: i32) {
    let cursor = state.setup_cursor;
    let Some(config) = state.selection.config_mut(cursor) else {
        return;
    };
    let start = i32::from(config.start_game()) + start_delta;
    let end = i32::from(config.end_game()) + end_delta;
    let (Ok(start), Ok(end)) = (u16::try_from(start), u16::try_from(end)) else {
        return;
    };
    if let Err(e) = config.set_range(start, end) {
        state.notice = Some(e.to_string());
    }
}

fn handle_scroll_key(code: KeyCode, state: &mut ViewState) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => state.scroll = state.scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => state.scroll = state.scroll.saturating_add(1),
        KeyCode::PageUp => state.scroll = state.scroll.saturating_sub(PAGE),
        KeyCode::PageDown => state.scroll = state.scroll.saturating_add(PAGE),
        KeyCode::Home => state.scroll = 0,
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
