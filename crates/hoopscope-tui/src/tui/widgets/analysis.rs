// Analysis tab: formatted comparison report.
//
// Each `ContentSection` becomes one styled line (headings get a blank line
// above them). Paragraph and bullet bodies are split with `inline_spans`
// so `**bold**` runs render bold instead of showing the markers.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use hoopscope_app::protocol::AnalysisStatus;
use hoopscope_llm::client::AnalysisError;
use hoopscope_llm::format::{inline_spans, ContentSection, SectionKind};

use super::status_bar::status_indicator;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = match state.analysis_status {
        AnalysisStatus::Complete if !state.analysis_sections.is_empty() => {
            section_lines(&state.analysis_sections)
        }
        AnalysisStatus::Complete => vec![Line::from("The model returned an empty analysis.")],
        AnalysisStatus::Failed => match &state.analysis_error {
            Some(error) => error_lines(error),
            None => vec![Line::from("Analysis failed.")],
        },
        AnalysisStatus::Loading => vec![Line::from(Span::styled(
            "Analyzing teams... (x to cancel)",
            Style::default().fg(Color::Yellow),
        ))],
        AnalysisStatus::Idle => vec![Line::from(Span::styled(
            "Pick 2-4 teams, adjust their windows on Setup, then press g to analyze.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title(state))
                .border_style(border_style(state.analysis_status)),
        )
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn title(state: &ViewState) -> Line<'static> {
    let (status_text, status_color) = status_indicator(state.analysis_status);
    let teams = state
        .last_matchup
        .as_ref()
        .map(|m| {
            m.configs()
                .iter()
                .map(|c| c.team().name)
                .collect::<Vec<_>>()
                .join(" vs ")
        })
        .unwrap_or_else(|| "Analysis".to_string());
    Line::from(vec![
        Span::styled(teams, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" -- ", Style::default().fg(Color::DarkGray)),
        Span::styled(status_text, Style::default().fg(status_color)),
    ])
}

fn border_style(status: AnalysisStatus) -> Style {
    match status {
        AnalysisStatus::Loading => Style::default().fg(Color::Yellow),
        AnalysisStatus::Failed => Style::default().fg(Color::Red),
        _ => Style::default(),
    }
}

/// Styled lines for a formatted report.
pub fn section_lines(sections: &[ContentSection]) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(sections.len() * 2);
    for (i, section) in sections.iter().enumerate() {
        let is_heading = matches!(
            section.kind,
            SectionKind::Title | SectionKind::Subtitle | SectionKind::Heading
        );
        if is_heading && i > 0 {
            lines.push(Line::default());
        }
        lines.push(section_line(section));
    }
    lines
}

fn section_line(section: &ContentSection) -> Line<'static> {
    let text = section.text.clone();
    match section.kind {
        SectionKind::Title => Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        SectionKind::Subtitle => Line::from(Span::styled(
            text,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        SectionKind::Heading => Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        SectionKind::Bullet => {
            let mut spans = vec![Span::styled("  \u{2022} ", Style::default().fg(Color::Cyan))];
            spans.extend(body_spans(&section.text));
            Line::from(spans)
        }
        SectionKind::Paragraph | SectionKind::Emphasis => Line::from(body_spans(&section.text)),
        SectionKind::Code => Line::from(Span::styled(
            text,
            Style::default().fg(Color::Green).bg(Color::Black),
        )),
    }
}

fn body_spans(text: &str) -> Vec<Span<'static>> {
    inline_spans(text)
        .into_iter()
        .map(|span| match span.kind {
            SectionKind::Emphasis => {
                Span::styled(span.text, Style::default().add_modifier(Modifier::BOLD))
            }
            _ => Span::raw(span.text),
        })
        .collect()
}

fn error_lines(error: &AnalysisError) -> Vec<Line<'static>> {
    let hint = match error {
        AnalysisError::MissingCredential => "Press a to enter your API key.",
        AnalysisError::Transport(_) => "Check your connection, then press r to retry.",
        AnalysisError::Remote { status: 401 | 403, .. } => {
            "The API key was refused. Press a to enter a new one."
        }
        AnalysisError::Remote { .. } | AnalysisError::MalformedResponse(_) => "Press r to retry.",
    };
    vec![
        Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))),
        Line::default(),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hoopscope_llm::format::format_response;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn headings_get_spacing_and_markers_are_gone() {
        let sections = format_response("# Title\n## Overview\nText\n### Lakers\n\u{2022} point");
        let lines = section_lines(&sections);
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            text,
            vec!["Title", "", "Overview", "Text", "", "Lakers", "  \u{2022} point"]
        );
    }

    #[test]
    fn bold_runs_render_bold_without_markers() {
        let sections = format_response("The **Lakers** won.");
        let lines = section_lines(&sections);
        assert_eq!(plain(&lines[0]), "The Lakers won.");
        let bold = &lines[0].spans[1];
        assert_eq!(bold.content, "Lakers");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn code_lines_are_green() {
        let lines = section_lines(&format_response("`ortg 118.2`"));
        assert_eq!(plain(&lines[0]), "ortg 118.2");
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn error_hints_match_error_kind() {
        let missing = error_lines(&AnalysisError::MissingCredential);
        assert!(plain(&missing[2]).contains("API key"));

        let unauthorized = error_lines(&AnalysisError::Remote {
            status: 401,
            body: String::new(),
        });
        assert!(plain(&unauthorized[2]).contains("refused"));

        let server = error_lines(&AnalysisError::Remote {
            status: 500,
            body: "rate limited".into(),
        });
        assert!(plain(&server[0]).contains("rate limited"));
        assert_eq!(plain(&server[2]), "Press r to retry.");
    }

    #[test]
    fn render_every_status() {
        let mut state = ViewState::new(2024, 20, 2025);
        for status in [
            AnalysisStatus::Idle,
            AnalysisStatus::Loading,
            AnalysisStatus::Complete,
            AnalysisStatus::Failed,
        ] {
            state.analysis_status = status;
            let backend = ratatui::backend::TestBackend::new(80, 20);
            let mut terminal = ratatui::Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| render(frame, frame.area(), &state))
                .unwrap();
        }
    }
}
