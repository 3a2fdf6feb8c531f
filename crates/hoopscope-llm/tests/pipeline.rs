// End-to-end: selection -> prompt -> client -> formatter, with a canned
// transport standing in for the remote endpoint.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hoopscope_core::matchup::{Matchup, TeamAnalysisConfig};
use hoopscope_core::teams::find_team;
use hoopscope_llm::client::{AnalysisClient, AnalysisError, ChatRequest, ChatTransport, HttpReply};
use hoopscope_llm::format::{format_response, SectionKind};
use hoopscope_llm::prompt::{build_analysis_prompt, PromptVariant};

/// Replies with a fixed completion and keeps the last request.
struct CannedTransport {
    content: &'static str,
    seen: Mutex<Option<ChatRequest>>,
}

#[async_trait]
impl ChatTransport for CannedTransport {
    async fn send(&self, _api_key: &str, request: &ChatRequest) -> Result<HttpReply, AnalysisError> {
        *self.seen.lock().unwrap() = Some(request.clone());
        let body = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": self.content } }]
        });
        Ok(HttpReply {
            status: 200,
            body: body.to_string(),
        })
    }
}

const REPLY: &str = "# NBA Team Comparison Analysis\n\n\
## Overview\n\
The **Lakers** closed strong while Boston started fast.\n\n\
## Best Team\n\
\u{2022} Los Angeles Lakers\n\n\
## Best Player on Each Team\n\
### Los Angeles Lakers\n\
- LeBron James\n\
### Boston Celtics\n\
- Jayson Tatum\n\
`net rating +6.1`\n";

fn lakers_celtics() -> Matchup {
    Matchup::new(vec![
        TeamAnalysisConfig::new(find_team("LAL").unwrap(), 2024, 63, 82).unwrap(),
        TeamAnalysisConfig::new(find_team("BOS").unwrap(), 2023, 1, 30).unwrap(),
    ])
    .unwrap()
}

#[tokio::test]
async fn analysis_flows_from_matchup_to_sections() {
    let transport = Arc::new(CannedTransport {
        content: REPLY,
        seen: Mutex::new(None),
    });
    let client = AnalysisClient::new(transport.clone(), "xai-key", "grok-4-latest");
    let matchup = lakers_celtics();

    let text = client
        .analyze(matchup.configs(), PromptVariant::Full)
        .await
        .unwrap();

    let seen = transport.seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.messages[1].content, build_analysis_prompt(matchup.configs()));
    assert!(seen.messages[1]
        .content
        .contains("2022-2023 season Boston Celtics games Last 30 games"));

    let sections = format_response(&text);
    let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Title,
            SectionKind::Subtitle,
            SectionKind::Paragraph,
            SectionKind::Subtitle,
            SectionKind::Bullet,
            SectionKind::Subtitle,
            SectionKind::Heading,
            SectionKind::Bullet,
            SectionKind::Heading,
            SectionKind::Bullet,
            SectionKind::Code,
        ]
    );
    assert_eq!(sections[0].text, "NBA Team Comparison Analysis");
    assert_eq!(sections[2].text, "The **Lakers** closed strong while Boston started fast.");
    assert_eq!(sections[10].text, "net rating +6.1");
}

#[tokio::test]
async fn missing_key_never_builds_a_request() {
    let transport = Arc::new(CannedTransport {
        content: REPLY,
        seen: Mutex::new(None),
    });
    let client = AnalysisClient::new(transport.clone(), "", "grok-4-latest");

    let err = client
        .analyze(lakers_celtics().configs(), PromptVariant::Quick)
        .await
        .unwrap_err();
    assert_eq!(err, AnalysisError::MissingCredential);
    assert!(transport.seen.lock().unwrap().is_none());
}
