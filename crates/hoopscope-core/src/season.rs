// Season and game-range arithmetic.
//
// A season is identified by the calendar year in which it ends (2024 is the
// 2023-2024 season). All functions here are pure.

use chrono::Datelike;

/// Length of a regular season without a lockout or pandemic interruption.
pub const FULL_SEASON_GAMES: u16 = 82;

/// Earliest season offered for comparison.
pub const FIRST_SEASON: u16 = 1980;

/// Shortened seasons, keyed by season year. This is a fixed policy table,
/// not a historical record; every season not listed is treated as 82 games.
const SHORTENED_SEASONS: &[(u16, u16)] = &[(1999, 50), (2012, 66), (2020, 65)];

/// Number of regular-season games for the given season.
pub fn max_games_for_season(season: u16) -> u16 {
    SHORTENED_SEASONS
        .iter()
        .find(|(year, _)| *year == season)
        .map(|(_, games)| *games)
        .unwrap_or(FULL_SEASON_GAMES)
}

/// Two-year season label, e.g. `"2023-2024 season"`.
pub fn season_display(season: u16) -> String {
    format!("{}-{} season", season.saturating_sub(1), season)
}

/// A season split into thirds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments {
    pub early: u16,
    pub mid: u16,
    pub late: u16,
}

/// Split a season into early/mid/late thirds.
///
/// The first two parts are `max_games / 3` rounded to the nearest integer and
/// the last part takes the remainder, so the three always sum to the season
/// length.
pub fn segments(season: u16) -> Segments {
    let max = max_games_for_season(season);
    let third = (max + 1) / 3;
    Segments {
        early: third,
        mid: third,
        late: max - 2 * third,
    }
}

/// A named, inclusive game window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePreset {
    pub label: &'static str,
    pub start_game: u16,
    pub end_game: u16,
}

impl RangePreset {
    fn clamped(label: &'static str, start: u16, end: u16, max: u16) -> Self {
        let end_game = end.clamp(1, max);
        let start_game = start.clamp(1, end_game);
        RangePreset {
            label,
            start_game,
            end_game,
        }
    }
}

/// The six preset ranges offered for a season, in display order: full season,
/// early/mid/late thirds, first 10 and last 10 games.
pub fn common_ranges(season: u16) -> Vec<RangePreset> {
    let max = max_games_for_season(season);
    let seg = segments(season);
    let mid_start = seg.early + 1;
    let late_start = seg.early + seg.mid + 1;

    vec![
        RangePreset::clamped("Full Season", 1, max, max),
        RangePreset::clamped("Early Season", 1, seg.early, max),
        RangePreset::clamped("Mid Season", mid_start, seg.early + seg.mid, max),
        RangePreset::clamped("Late Season", late_start, max, max),
        RangePreset::clamped("First 10 Games", 1, 10, max),
        RangePreset::clamped("Last 10 Games", max.saturating_sub(9), max, max),
    ]
}

/// The season in progress (or most recently started) on `today`. A new season
/// is considered started from October onward.
pub fn current_season<D: Datelike>(today: &D) -> u16 {
    let year = u16::try_from(today.year()).unwrap_or(FIRST_SEASON);
    if today.month() >= 10 {
        year.saturating_add(1)
    } else {
        year
    }
}

/// All selectable seasons, newest first.
pub fn available_seasons(current: u16) -> Vec<u16> {
    (FIRST_SEASON..=current.max(FIRST_SEASON)).rev().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
