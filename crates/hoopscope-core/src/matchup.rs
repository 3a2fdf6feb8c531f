// Per-team analysis windows and the comparison set built from them.

use thiserror::Error;

use crate::season::{max_games_for_season, RangePreset};
use crate::teams::{find_team, Team};

/// Fewest teams a comparison may contain.
pub const MIN_TEAMS: usize = 2;
/// Most teams a comparison may contain.
pub const MAX_TEAMS: usize = 4;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchupError {
    #[error("select at least {min} teams to compare (got {0})", min = MIN_TEAMS)]
    TooFewTeams(usize),

    #[error("at most {max} teams can be compared (got {0})", max = MAX_TEAMS)]
    TooManyTeams(usize),

    #[error("{0} is already part of the comparison")]
    DuplicateTeam(&'static str),

    #[error("unknown team id: {0}")]
    UnknownTeam(String),

    #[error("invalid game range {start}-{end} for season {season} (valid: 1-{max})")]
    InvalidRange {
        season: u16,
        start: u16,
        end: u16,
        max: u16,
    },
}

// ---------------------------------------------------------------------------
// TeamAnalysisConfig
// ---------------------------------------------------------------------------

/// One team's season and inclusive game window.
///
/// Invariant: `1 <= start_game <= end_game <= max_games_for_season(season)`.
/// Fields are private so every mutation goes through a method that keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAnalysisConfig {
    team: &'static Team,
    season: u16,
    start_game: u16,
    end_game: u16,
}

impl TeamAnalysisConfig {
    pub fn new(
        team: &'static Team,
        season: u16,
        start_game: u16,
        end_game: u16,
    ) -> Result<Self, MatchupError> {
        check_range(season, start_game, end_game)?;
        Ok(TeamAnalysisConfig {
            team,
            season,
            start_game,
            end_game,
        })
    }

    /// Like [`TeamAnalysisConfig::new`], looking the team up by its catalog id.
    pub fn for_team_id(
        id: &str,
        season: u16,
        start_game: u16,
        end_game: u16,
    ) -> Result<Self, MatchupError> {
        let team = find_team(id).ok_or_else(|| MatchupError::UnknownTeam(id.to_string()))?;
        Self::new(team, season, start_game, end_game)
    }

    /// Games `1..=default_games`, shortened to fit the season.
    pub fn with_default_range(team: &'static Team, season: u16, default_games: u16) -> Self {
        let end_game = default_games.clamp(1, max_games_for_season(season));
        TeamAnalysisConfig {
            team,
            season,
            start_game: 1,
            end_game,
        }
    }

    pub fn team(&self) -> &'static Team {
        self.team
    }

    pub fn season(&self) -> u16 {
        self.season
    }

    pub fn start_game(&self) -> u16 {
        self.start_game
    }

    pub fn end_game(&self) -> u16 {
        self.end_game
    }

    pub fn max_games(&self) -> u16 {
        max_games_for_season(self.season)
    }

    pub fn total_games(&self) -> u16 {
        self.end_game - self.start_game + 1
    }

    /// Human-readable window: "Full Season", "Last N games" for a window that
    /// opens at game 1, otherwise "Games A-B".
    pub fn game_range_display(&self) -> String {
        if self.start_game == 1 && self.end_game == self.max_games() {
            "Full Season".to_string()
        } else if self.start_game == 1 {
            format!("Last {} games", self.total_games())
        } else {
            format!("Games {}-{}", self.start_game, self.end_game)
        }
    }

    /// Switch seasons, pulling the window back inside the new season's length.
    pub fn set_season(&mut self, season: u16) {
        let max = max_games_for_season(season);
        self.season = season;
        self.end_game = self.end_game.min(max);
        self.start_game = self.start_game.min(self.end_game);
    }

    pub fn set_range(&mut self, start_game: u16, end_game: u16) -> Result<(), MatchupError> {
        check_range(self.season, start_game, end_game)?;
        self.start_game = start_game;
        self.end_game = end_game;
        Ok(())
    }

    /// Replace the window with a preset, clamped to this config's season.
    pub fn apply_preset(&mut self, preset: &RangePreset) {
        let max = self.max_games();
        self.end_game = preset.end_game.clamp(1, max);
        self.start_game = preset.start_game.clamp(1, self.end_game);
    }
}

fn check_range(season: u16, start: u16, end: u16) -> Result<(), MatchupError> {
    let max = max_games_for_season(season);
    if start < 1 || start > end || end > max {
        return Err(MatchupError::InvalidRange {
            season,
            start,
            end,
            max,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Matchup
// ---------------------------------------------------------------------------

/// A validated comparison request: 2-4 configs for distinct teams, in the
/// order the user picked them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    configs: Vec<TeamAnalysisConfig>,
}

impl Matchup {
    pub fn new(configs: Vec<TeamAnalysisConfig>) -> Result<Self, MatchupError> {
        if configs.len() < MIN_TEAMS {
            return Err(MatchupError::TooFewTeams(configs.len()));
        }
        if configs.len() > MAX_TEAMS {
            return Err(MatchupError::TooManyTeams(configs.len()));
        }
        for (i, config) in configs.iter().enumerate() {
            if configs[..i].iter().any(|c| c.team.id == config.team.id) {
                return Err(MatchupError::DuplicateTeam(config.team.full_name));
            }
        }
        Ok(Matchup { configs })
    }

    pub fn configs(&self) -> &[TeamAnalysisConfig] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TeamSelection
// ---------------------------------------------------------------------------

/// The comparison set while the user is still building it. Unlike `Matchup`
/// it may hold 0 or 1 entries; it never holds more than `MAX_TEAMS`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSelection {
    configs: Vec<TeamAnalysisConfig>,
}

impl TeamSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, team: &Team) -> bool {
        self.configs.iter().any(|c| c.team.id == team.id)
    }

    /// Add the team with a default window, or remove it if already selected.
    ///
    /// Returns `false` when the team could not be added because the selection
    /// is full.
    pub fn toggle(&mut self, team: &'static Team, season: u16, default_games: u16) -> bool {
        if let Some(pos) = self.configs.iter().position(|c| c.team.id == team.id) {
            self.configs.remove(pos);
            return true;
        }
        if self.configs.len() >= MAX_TEAMS {
            return false;
        }
        self.configs
            .push(TeamAnalysisConfig::with_default_range(team, season, default_games));
        true
    }

    pub fn clear(&mut self) {
        self.configs.clear();
    }

    pub fn configs(&self) -> &[TeamAnalysisConfig] {
        &self.configs
    }

    pub fn config_mut(&mut self, index: usize) -> Option<&mut TeamAnalysisConfig> {
        self.configs.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        (MIN_TEAMS..=MAX_TEAMS).contains(&self.configs.len())
    }

    /// Snapshot the selection as a validated comparison request.
    pub fn to_matchup(&self) -> Result<Matchup, MatchupError> {
        Matchup::new(self.configs.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
