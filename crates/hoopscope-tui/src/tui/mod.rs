// Terminal front end: view state, update handling, rendering and the input loop.
//
// The TUI owns a `ViewState` holding everything the user edits (team picks,
// seasons, game windows) plus a mirror of the analysis state. The app loop
// pushes `UiUpdate` messages over an mpsc channel; the TUI applies them and
// re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use hoopscope_app::protocol::{AnalysisStatus, UiUpdate, UserCommand};
use hoopscope_core::matchup::{Matchup, TeamSelection};
use hoopscope_core::season::available_seasons;
use hoopscope_core::teams::{search_teams, Team};
use hoopscope_llm::client::AnalysisError;
use hoopscope_llm::format::ContentSection;
use hoopscope_llm::prompt::PromptVariant;

use layout::build_layout;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Teams,
    Setup,
    Prompt,
    Analysis,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Teams, Tab::Setup, Tab::Prompt, Tab::Analysis];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Teams => "Teams",
            Tab::Setup => "Setup",
            Tab::Prompt => "Prompt",
            Tab::Analysis => "Analysis",
        }
    }

    pub fn next(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state. Selection editing happens here; the app loop only sees
/// a finished `Matchup` when the user asks for an analysis.
pub struct ViewState {
    pub active_tab: Tab,
    pub selection: TeamSelection,
    /// Season and window length given to newly picked teams.
    pub default_season: u16,
    pub default_games: u16,
    /// Selectable seasons, newest first.
    pub seasons: Vec<u16>,

    pub search_query: String,
    pub search_mode: bool,
    /// Row in the (filtered) team list.
    pub team_cursor: usize,
    /// Row in the selected-teams list on the Setup tab.
    pub setup_cursor: usize,
    /// Next preset offered by `p` on the Setup tab.
    pub preset_cursor: usize,
    pub variant: PromptVariant,

    pub analysis_status: AnalysisStatus,
    pub analysis_sections: Vec<ContentSection>,
    pub analysis_error: Option<AnalysisError>,
    pub last_matchup: Option<Matchup>,
    pub scroll: u16,

    pub has_credential: bool,
    /// `Some` while the API key prompt is open.
    pub key_entry: Option<String>,
    /// One-line notice shown above the help bar.
    pub notice: Option<String>,
}

impl ViewState {
    pub fn new(default_season: u16, default_games: u16, current_season: u16) -> Self {
        ViewState {
            active_tab: Tab::Teams,
            selection: TeamSelection::new(),
            default_season,
            default_games,
            seasons: available_seasons(current_season),
            search_query: String::new(),
            search_mode: false,
            team_cursor: 0,
            setup_cursor: 0,
            preset_cursor: 0,
            variant: PromptVariant::default(),
            analysis_status: AnalysisStatus::Idle,
            analysis_sections: Vec::new(),
            analysis_error: None,
            last_matchup: None,
            scroll: 0,
            has_credential: false,
            key_entry: None,
            notice: None,
        }
    }

    /// Teams matching the current search query.
    pub fn visible_teams(&self) -> Vec<&'static Team> {
        search_teams(&self.search_query)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::CredentialStatus(present) => {
            state.has_credential = present;
        }
        UiUpdate::AnalysisStarted { matchup, variant } => {
            state.analysis_status = AnalysisStatus::Loading;
            state.analysis_sections.clear();
            state.analysis_error = None;
            state.last_matchup = Some(matchup);
            state.variant = variant;
            state.scroll = 0;
            state.notice = None;
        }
        UiUpdate::AnalysisComplete { sections, .. } => {
            state.analysis_status = AnalysisStatus::Complete;
            state.analysis_sections = sections;
            state.scroll = 0;
        }
        UiUpdate::AnalysisFailed(error) => {
            state.analysis_status = AnalysisStatus::Failed;
            if error.needs_settings() {
                state.notice = Some("No API key configured. Press 'a' to enter one.".into());
            }
            state.analysis_error = Some(error);
        }
        UiUpdate::AnalysisCancelled => {
            state.analysis_status = AnalysisStatus::Idle;
            state.notice = Some("Analysis cancelled.".into());
        }
        UiUpdate::ApiKeySaved => {
            state.key_entry = None;
            state.notice = Some("API key saved.".into());
        }
        UiUpdate::ApiKeyRejected(message) => {
            state.notice = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        Tab::Teams => widgets::team_picker::render(frame, layout.main_panel, state),
        Tab::Setup => widgets::matchup_setup::render(frame, layout.main_panel, state),
        Tab::Prompt => widgets::prompt_preview::render(frame, layout.main_panel, state),
        Tab::Analysis => widgets::analysis::render(frame, layout.main_panel, state),
    }
    widgets::status_bar::render_notice(frame, layout.notice, state);
    widgets::status_bar::render_help(frame, layout.help_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI until the user quits or the app loop hangs up.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hoopscope_core::matchup::TeamAnalysisConfig;
    use hoopscope_core::teams::find_team;
    use hoopscope_llm::format::SectionKind;

    fn view() -> ViewState {
        ViewState::new(2024, 20, 2025)
    }

    fn matchup() -> Matchup {
        Matchup::new(vec![
            TeamAnalysisConfig::new(find_team("LAL").unwrap(), 2024, 63, 82).unwrap(),
            TeamAnalysisConfig::new(find_team("BOS").unwrap(), 2023, 1, 30).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn view_state_defaults() {
        let state = view();
        assert_eq!(state.active_tab, Tab::Teams);
        assert!(state.selection.is_empty());
        assert_eq!(state.seasons.first(), Some(&2025));
        assert_eq!(state.seasons.last(), Some(&1980));
        assert_eq!(state.analysis_status, AnalysisStatus::Idle);
        assert_eq!(state.variant, PromptVariant::Full);
        assert!(!state.has_credential);
        assert!(state.key_entry.is_none());
        assert_eq!(state.visible_teams().len(), 30);
    }

    #[test]
    fn tab_cycle_wraps() {
        assert_eq!(Tab::Teams.next(), Tab::Setup);
        assert_eq!(Tab::Analysis.next(), Tab::Teams);
    }

    #[test]
    fn analysis_started_resets_previous_result() {
        let mut state = view();
        state.analysis_sections = vec![ContentSection::new(SectionKind::Paragraph, "old")];
        state.analysis_error = Some(AnalysisError::Transport("x".into()));
        state.scroll = 7;

        apply_ui_update(
            &mut state,
            UiUpdate::AnalysisStarted {
                matchup: matchup(),
                variant: PromptVariant::Quick,
            },
        );

        assert_eq!(state.analysis_status, AnalysisStatus::Loading);
        assert!(state.analysis_sections.is_empty());
        assert!(state.analysis_error.is_none());
        assert_eq!(state.scroll, 0);
        assert_eq!(state.variant, PromptVariant::Quick);
        assert_eq!(state.last_matchup, Some(matchup()));
    }

    #[test]
    fn analysis_complete_stores_sections() {
        let mut state = view();
        let sections = vec![ContentSection::new(SectionKind::Title, "NBA Team Comparison Analysis")];
        apply_ui_update(
            &mut state,
            UiUpdate::AnalysisComplete {
                text: "# NBA Team Comparison Analysis".into(),
                sections: sections.clone(),
            },
        );
        assert_eq!(state.analysis_status, AnalysisStatus::Complete);
        assert_eq!(state.analysis_sections, sections);
    }

    #[test]
    fn missing_credential_failure_points_to_key_entry() {
        let mut state = view();
        apply_ui_update(&mut state, UiUpdate::AnalysisFailed(AnalysisError::MissingCredential));
        assert_eq!(state.analysis_status, AnalysisStatus::Failed);
        assert!(state.notice.as_deref().unwrap().contains("'a'"));
    }

    #[test]
    fn remote_failure_keeps_error_without_notice() {
        let mut state = view();
        let err = AnalysisError::Remote {
            status: 500,
            body: "rate limited".into(),
        };
        apply_ui_update(&mut state, UiUpdate::AnalysisFailed(err.clone()));
        assert_eq!(state.analysis_error, Some(err));
        assert!(state.notice.is_none());
    }

    #[test]
    fn api_key_saved_closes_prompt() {
        let mut state = view();
        state.key_entry = Some("xai-abc".into());
        apply_ui_update(&mut state, UiUpdate::ApiKeySaved);
        assert!(state.key_entry.is_none());
        assert_eq!(state.notice.as_deref(), Some("API key saved."));

        apply_ui_update(&mut state, UiUpdate::CredentialStatus(true));
        assert!(state.has_credential);
    }

    #[test]
    fn api_key_rejected_keeps_prompt_open() {
        let mut state = view();
        state.key_entry = Some("bad".into());
        apply_ui_update(
            &mut state,
            UiUpdate::ApiKeyRejected("API key should start with 'xai-'".into()),
        );
        assert_eq!(state.key_entry.as_deref(), Some("bad"));
        assert!(state.notice.as_deref().unwrap().contains("xai-"));
    }

    #[test]
    fn render_frame_every_tab() {
        let mut state = view();
        state.selection.toggle(find_team("LAL").unwrap(), 2024, 20);
        state.selection.toggle(find_team("BOS").unwrap(), 2024, 20);
        for tab in Tab::ALL {
            state.active_tab = tab;
            let backend = ratatui::backend::TestBackend::new(120, 40);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            terminal.draw(|frame| render_frame(frame, &state)).unwrap();
        }
    }

    #[test]
    fn render_frame_tiny_terminal() {
        let state = view();
        let backend = ratatui::backend::TestBackend::new(20, 4);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_frame(frame, &state)).unwrap();
    }
}
