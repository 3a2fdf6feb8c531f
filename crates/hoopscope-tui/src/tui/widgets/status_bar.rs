// Status bar, notice line and help bar.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use hoopscope_app::protocol::AnalysisStatus;
use hoopscope_core::matchup::MAX_TEAMS;
use hoopscope_llm::prompt::PromptVariant;

use crate::tui::{Tab, ViewState};

/// Layout: [tab bar] | [selection count] | [variant] | [key] | [analysis status]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = tab_spans(state.active_tab);

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("{}/{} teams", state.selection.len(), MAX_TEAMS),
        Style::default().fg(if state.selection.is_ready() {
            Color::Green
        } else {
            Color::White
        }),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        variant_label(state.variant),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (key_text, key_color) = credential_indicator(state.has_credential);
    spans.push(Span::styled(key_text, Style::default().fg(key_color)));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (status_text, status_color) = status_indicator(state.analysis_status);
    spans.push(Span::styled(status_text, Style::default().fg(status_color)));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// The API key prompt while it is open, otherwise the latest notice.
pub fn render_notice(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match (&state.key_entry, &state.notice) {
        (Some(entry), notice) => {
            let mut spans = vec![
                Span::styled(" API key: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(mask_key(entry)),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ];
            if let Some(notice) = notice {
                spans.push(Span::styled(format!("  {notice}"), Style::default().fg(Color::Red)));
            }
            Line::from(spans)
        }
        (None, Some(notice)) => Line::from(Span::styled(
            format!(" {notice}"),
            Style::default().fg(Color::Yellow),
        )),
        (None, None) => Line::default(),
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_help(frame: &mut Frame, area: Rect, state: &ViewState) {
    let text = if state.key_entry.is_some() {
        " Enter:Save | Esc:Cancel"
    } else if state.search_mode {
        " Type to filter | Enter:Done | Esc:Clear"
    } else {
        help_text(state.active_tab)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// "[1:Teams] [2:Setup] [3:Prompt] [4:Analysis]" with the active tab highlighted.
pub fn tab_spans(active: Tab) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let style = if *tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, tab.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn status_indicator(status: AnalysisStatus) -> (&'static str, Color) {
    match status {
        AnalysisStatus::Idle => ("idle", Color::DarkGray),
        AnalysisStatus::Loading => ("analyzing...", Color::Yellow),
        AnalysisStatus::Complete => ("complete", Color::Green),
        AnalysisStatus::Failed => ("error", Color::Red),
    }
}

pub fn credential_indicator(present: bool) -> (&'static str, Color) {
    if present {
        ("key set", Color::Green)
    } else {
        ("no API key", Color::Red)
    }
}

fn variant_label(variant: PromptVariant) -> &'static str {
    match variant {
        PromptVariant::Full => "full prompt",
        PromptVariant::Quick => "quick prompt",
    }
}

pub fn help_text(tab: Tab) -> &'static str {
    match tab {
        Tab::Teams => " Space:Pick | /:Search | c:Clear | g:Analyze | v:Variant | a:API key | q:Quit",
        Tab::Setup => {
            " \u{2190}\u{2192}:Season | p:Preset | [ ]:Start | { }:End | d:Remove | g:Analyze | q:Quit"
        }
        Tab::Prompt => " \u{2191}\u{2193}:Scroll | v:Variant | g:Analyze | q:Quit",
        Tab::Analysis => " \u{2191}\u{2193}:Scroll | r:Retry | x:Cancel | a:API key | q:Quit",
    }
}

/// Show the provider prefix and hide the rest.
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    let hidden = key.chars().count().saturating_sub(4);
    format!("{visible}{}", "*".repeat(hidden))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
