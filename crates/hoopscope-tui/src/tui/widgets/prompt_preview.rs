// Prompt tab: the system message and the exact user message that will be
// sent for the current selection.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use hoopscope_core::matchup::{MAX_TEAMS, MIN_TEAMS};
use hoopscope_llm::prompt::{build_prompt, system_prompt, PromptVariant};

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let text = match preview_text(state) {
        Some(prompt) => message_text(&prompt),
        None => Text::styled(
            format!("Pick {MIN_TEAMS}-{MAX_TEAMS} teams to preview the prompt."),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let title = match state.variant {
        PromptVariant::Full => "Prompt (full)",
        PromptVariant::Quick => "Prompt (quick)",
    };

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn message_text(prompt: &str) -> Text<'static> {
    let label = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("[system]", label))];
    lines.extend(system_prompt().lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("[user]", label)));
    lines.extend(prompt.lines().map(|l| Line::from(l.to_string())));
    Text::from(lines)
}

/// The user message for the current selection, or `None` while it is incomplete.
pub fn preview_text(state: &ViewState) -> Option<String> {
    if !state.selection.is_ready() {
        return None;
    }
    Some(build_prompt(state.variant, state.selection.configs()))
}
