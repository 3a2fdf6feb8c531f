// Messages exchanged between the app loop, analysis tasks and the TUI.

use hoopscope_core::matchup::Matchup;
use hoopscope_llm::client::AnalysisError;
use hoopscope_llm::format::ContentSection;
use hoopscope_llm::prompt::PromptVariant;

/// Coarse analysis status shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Idle,
    Loading,
    Complete,
    Failed,
}

/// Result of a spawned analysis task, tagged with the generation it was
/// started under.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    Completed { text: String, generation: u64 },
    Failed { error: AnalysisError, generation: u64 },
}

impl AnalysisEvent {
    pub fn generation(&self) -> u64 {
        match self {
            AnalysisEvent::Completed { generation, .. } | AnalysisEvent::Failed { generation, .. } => {
                *generation
            }
        }
    }
}

/// App loop -> TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Whether an API key is currently configured.
    CredentialStatus(bool),
    AnalysisStarted { matchup: Matchup, variant: PromptVariant },
    AnalysisComplete { text: String, sections: Vec<ContentSection> },
    AnalysisFailed(AnalysisError),
    AnalysisCancelled,
    ApiKeySaved,
    ApiKeyRejected(String),
}

/// TUI -> app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Analyze { matchup: Matchup, variant: PromptVariant },
    /// Re-run the most recent comparison.
    Retry,
    Cancel,
    SaveApiKey(String),
    Quit,
}
