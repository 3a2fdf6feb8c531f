// Application state and the main event loop.
//
// One analysis runs at a time. Starting a new one aborts the previous task
// and bumps the generation counter, so a result that was already in flight
// when the user moved on is recognized as stale and dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use hoopscope_core::config::{self, Config, ConfigError};
use hoopscope_core::matchup::Matchup;
use hoopscope_llm::client::{AnalysisClient, AnalysisError};
use hoopscope_llm::format::{format_response, ContentSection};
use hoopscope_llm::prompt::PromptVariant;

use crate::protocol::{AnalysisEvent, AnalysisStatus, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AnalysisState
// ---------------------------------------------------------------------------

/// Lifecycle of the current comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    Idle,
    Loading,
    Done {
        text: String,
        sections: Vec<ContentSection>,
    },
    Failed(AnalysisError),
}

impl AnalysisState {
    pub fn status(&self) -> AnalysisStatus {
        match self {
            AnalysisState::Idle => AnalysisStatus::Idle,
            AnalysisState::Loading => AnalysisStatus::Loading,
            AnalysisState::Done { .. } => AnalysisStatus::Complete,
            AnalysisState::Failed(_) => AnalysisStatus::Failed,
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub analysis: AnalysisState,
    /// Shared with spawned analysis tasks.
    pub client: Arc<AnalysisClient>,
    /// Incremented every time a task is spawned or cancelled. Events carrying
    /// any other value are discarded in `handle_analysis_event`.
    pub generation: u64,
    pub current_task: Option<JoinHandle<()>>,
    /// The most recent comparison, kept for `UserCommand::Retry`.
    pub last_request: Option<(Matchup, PromptVariant)>,
    pub event_tx: mpsc::Sender<AnalysisEvent>,
}

impl AppState {
    pub fn new(config: Config, client: AnalysisClient, event_tx: mpsc::Sender<AnalysisEvent>) -> Self {
        AppState {
            config,
            analysis: AnalysisState::Idle,
            client: Arc::new(client),
            generation: 0,
            current_task: None,
            last_request: None,
            event_tx,
        }
    }

    /// Abort the running task, if any.
    fn abort_task(&mut self) {
        if let Some(handle) = self.current_task.take() {
            handle.abort();
            debug!("Aborted analysis task");
        }
    }

    /// Spawn an analysis for `matchup`, replacing any in-flight one. Returns
    /// the generation assigned to the new task.
    pub fn start_analysis(&mut self, matchup: Matchup, variant: PromptVariant) -> u64 {
        self.abort_task();

        self.generation += 1;
        let generation = self.generation;
        self.analysis = AnalysisState::Loading;
        self.last_request = Some((matchup.clone(), variant));

        let client = Arc::clone(&self.client);
        let tx = self.event_tx.clone();
        let team_count = matchup.len();

        let handle = tokio::spawn(async move {
            let event = match client.analyze(matchup.configs(), variant).await {
                Ok(text) => AnalysisEvent::Completed { text, generation },
                Err(error) => AnalysisEvent::Failed { error, generation },
            };
            if tx.send(event).await.is_err() {
                debug!("Analysis channel closed before result was delivered");
            }
        });

        self.current_task = Some(handle);
        info!(
            "Started {:?} analysis of {} teams (gen: {})",
            variant, team_count, generation
        );
        generation
    }

    /// Restart the last comparison. Returns `false` when nothing has been
    /// requested yet.
    pub fn retry(&mut self) -> bool {
        match self.last_request.clone() {
            Some((matchup, variant)) => {
                self.start_analysis(matchup, variant);
                true
            }
            None => false,
        }
    }

    /// Stop a loading analysis. Returns `false` if nothing was loading.
    pub fn cancel_analysis(&mut self) -> bool {
        if self.analysis != AnalysisState::Loading {
            return false;
        }
        self.abort_task();
        self.generation += 1;
        self.analysis = AnalysisState::Idle;
        info!("Analysis cancelled (gen now {})", self.generation);
        true
    }

    /// Apply a task result. Returns the UI update to forward, or `None` when
    /// the event is stale.
    pub fn handle_analysis_event(&mut self, event: AnalysisEvent) -> Option<UiUpdate> {
        if event.generation() != self.generation {
            debug!(
                "Discarding stale analysis event (event gen: {}, current gen: {})",
                event.generation(),
                self.generation
            );
            return None;
        }
        self.current_task = None;

        match event {
            AnalysisEvent::Completed { text, .. } => {
                let sections = format_response(&text);
                info!("Analysis complete: {} sections", sections.len());
                self.analysis = AnalysisState::Done {
                    text: text.clone(),
                    sections: sections.clone(),
                };
                Some(UiUpdate::AnalysisComplete { text, sections })
            }
            AnalysisEvent::Failed { error, .. } => {
                warn!("Analysis failed: {}", error);
                self.analysis = AnalysisState::Failed(error.clone());
                Some(UiUpdate::AnalysisFailed(error))
            }
        }
    }

    /// Validate, persist and start using a new API key.
    pub fn save_api_key(&mut self, key: &str) -> Result<(), ConfigError> {
        let credentials = config::save_api_key(&self.config.config_dir, key)?;
        let api_key = credentials.api_key().unwrap_or_default().to_string();
        self.client = Arc::new(self.client.with_api_key(api_key));
        self.config.credentials = credentials;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application loop until `Quit` or the command channel closes.
///
/// Listens on analysis results and user commands with `tokio::select!` and
/// pushes UI updates through `ui_tx`.
pub async fn run(
    mut event_rx: mpsc::Receiver<AnalysisEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::CredentialStatus(state.client.has_credential()))
        .await;

    let mut events_open = true;

    loop {
        tokio::select! {
            event = event_rx.recv(), if events_open => {
                match event {
                    Some(event) => {
                        if let Some(update) = state.handle_analysis_event(event) {
                            let _ = ui_tx.send(update).await;
                        }
                    }
                    None => {
                        info!("Analysis channel closed");
                        events_open = false;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    state.abort_task();
    info!("Application event loop exiting");
    Ok(())
}

async fn handle_user_command(state: &mut AppState, cmd: UserCommand, ui_tx: &mpsc::Sender<UiUpdate>) {
    match cmd {
        UserCommand::Analyze { matchup, variant } => {
            state.start_analysis(matchup.clone(), variant);
            let _ = ui_tx.send(UiUpdate::AnalysisStarted { matchup, variant }).await;
        }
        UserCommand::Retry => {
            if state.retry() {
                if let Some((matchup, variant)) = state.last_request.clone() {
                    let _ = ui_tx.send(UiUpdate::AnalysisStarted { matchup, variant }).await;
                }
            } else {
                debug!("Retry requested with no previous comparison");
            }
        }
        UserCommand::Cancel => {
            if state.cancel_analysis() {
                let _ = ui_tx.send(UiUpdate::AnalysisCancelled).await;
            }
        }
        UserCommand::SaveApiKey(key) => match state.save_api_key(&key) {
            Ok(()) => {
                let _ = ui_tx.send(UiUpdate::ApiKeySaved).await;
                let _ = ui_tx
                    .send(UiUpdate::CredentialStatus(state.client.has_credential()))
                    .await;
            }
            Err(e) => {
                warn!("API key not saved: {}", e);
                let _ = ui_tx.send(UiUpdate::ApiKeyRejected(e.to_string())).await;
            }
        },
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
