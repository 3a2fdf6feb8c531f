// One module per panel.

pub mod analysis;
pub mod matchup_setup;
pub mod prompt_preview;
pub mod status_bar;
pub mod team_picker;
