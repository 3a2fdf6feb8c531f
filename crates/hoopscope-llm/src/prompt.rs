// Prompt templates for team comparison analysis.
//
// Builds the fixed-structure prompt sent as the user message. The response
// formatter relies on the heading skeleton requested here, so section titles
// must not drift between the two.

use hoopscope_core::matchup::TeamAnalysisConfig;
use hoopscope_core::season::season_display;

/// Main title requested from the model.
pub const REPORT_TITLE: &str = "NBA Team Comparison Analysis";

/// `##` sections, in order. The bool marks sections that get one `###`
/// subsection per team.
const REPORT_SECTIONS: &[(&str, bool)] = &[
    ("Overview", false),
    ("Best Team", false),
    ("Best Player on Each Team", true),
    ("Best Overall Player", false),
    ("Strengths and Weaknesses of Each Team", true),
    ("Other Interesting Facts", true),
];

/// Which prompt template to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVariant {
    /// Detailed prompt with per-section guidance.
    #[default]
    Full,
    /// One-line team summary and abbreviated instructions.
    Quick,
}

// ---------------------------------------------------------------------------
// System prompt
// ---------------------------------------------------------------------------

/// Return the static system message sent with every analysis request.
pub fn system_prompt() -> String {
    "You are a highly intelligent, helpful AI assistant. When providing analysis, \
     please format your response using markdown with clear headings and bullet points. \
     Use # for main titles, ## for subtitles, ### for section headings, and \u{2022} for bullet points. \
     Do NOT use bold formatting (**text**) within paragraphs - only use bold for section headings. \
     Keep the content clean and well-structured."
        .to_string()
}

// ---------------------------------------------------------------------------
// Heading skeleton
// ---------------------------------------------------------------------------

/// The heading lines the model is asked to reproduce, in order.
pub fn section_skeleton(configs: &[TeamAnalysisConfig]) -> Vec<String> {
    let mut lines = vec![format!("# {REPORT_TITLE}")];
    for (section, per_team) in REPORT_SECTIONS {
        lines.push(format!("## {section}"));
        if *per_team {
            for config in configs {
                lines.push(format!("### {}", subsection_title(section, config)));
            }
        }
    }
    lines
}

fn subsection_title(section: &str, config: &TeamAnalysisConfig) -> String {
    if section.starts_with("Strengths and Weaknesses") {
        format!("{} Strengths and Weaknesses", config.team().full_name)
    } else {
        config.team().full_name.to_string()
    }
}

fn section_guidance(section: &str) -> &'static str {
    match section {
        "Overview" => "[Brief overview of the teams being compared and the analysis period]",
        "Best Team" => "[Analysis of which team was the best during their respective stretch and why]",
        "Best Player on Each Team" => "[Analysis of the best player on this team during their stretch]",
        "Best Overall Player" => "[Analysis of who was the best overall player across all teams and why]",
        "Strengths and Weaknesses of Each Team" => {
            "[Analysis of this team's strengths and weaknesses during their stretch]"
        }
        _ => "[Interesting facts about this team during their stretch]",
    }
}

fn quick_guidance(section: &str) -> &'static str {
    match section {
        "Overview" => "[Brief overview]",
        "Other Interesting Facts" => "[Facts]",
        _ => "[Analysis]",
    }
}

/// Append the skeleton with a placeholder line under every leaf heading.
fn push_skeleton(
    prompt: &mut String,
    configs: &[TeamAnalysisConfig],
    guidance: fn(&str) -> &'static str,
) {
    prompt.push_str(&format!("# {REPORT_TITLE}\n\n"));
    for (section, per_team) in REPORT_SECTIONS {
        prompt.push_str(&format!("## {section}\n"));
        if *per_team {
            for config in configs {
                prompt.push_str(&format!(
                    "### {}\n{}\n\n",
                    subsection_title(section, config),
                    guidance(section)
                ));
            }
        } else {
            prompt.push_str(&format!("{}\n\n", guidance(section)));
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis prompts
// ---------------------------------------------------------------------------

/// One line describing a team's stretch, e.g.
/// `"2023-2024 season Los Angeles Lakers games Games 63-82"`.
pub fn team_line(config: &TeamAnalysisConfig) -> String {
    format!(
        "{} {} games {}",
        season_display(config.season()),
        config.team().full_name,
        config.game_range_display()
    )
}

/// Build the detailed comparison prompt. `configs` holds 2-4 entries; the
/// count is validated upstream by `Matchup`.
pub fn build_analysis_prompt(configs: &[TeamAnalysisConfig]) -> String {
    let count = configs.len();
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(&format!(
        "You are an NBA analyst and you use basketball-reference.com to collect any statistics needed for your analysis.\n\n\
         You are going to be comparing {count} NBA teams over a specific stretch of games within their season.\n\n\
         The {count} teams and game stretches you will be analyzing are:\n\n"
    ));

    for config in configs {
        prompt.push_str(&team_line(config));
        prompt.push('\n');
    }
    prompt.push('\n');

    prompt.push_str("Please provide a detailed analysis with the following EXACT structure and formatting:\n\n");
    push_skeleton(&mut prompt, configs, section_guidance);

    prompt.push_str(
        "IMPORTANT: Follow this EXACT structure with these EXACT section titles. \
         Use # for the main title, ## for major sections, and ### for subsections. \
         Do NOT use bold formatting (**text**) within paragraphs. \
         Keep the content clean and well-structured.\n\n\
         Do not explain your reasoning process - present the analysis as quick and meaningful information.",
    );

    prompt
}

/// Build the condensed prompt: a one-line summary of the teams followed by
/// the same heading skeleton with terse placeholders.
pub fn build_quick_prompt(configs: &[TeamAnalysisConfig]) -> String {
    let summary = configs
        .iter()
        .map(|c| {
            format!(
                "{} ({}, {})",
                c.team().name,
                season_display(c.season()),
                c.game_range_display()
            )
        })
        .collect::<Vec<_>>()
        .join(" vs ");

    let mut prompt = String::with_capacity(1024);
    prompt.push_str(&format!("Compare these NBA teams: {summary}. "));
    prompt.push_str("Please provide a brief but insightful analysis with the following structure:\n\n");
    push_skeleton(&mut prompt, configs, quick_guidance);
    prompt.push_str(
        "Use # for the main title, ## for major sections, and ### for subsections. \
         Do NOT use bold formatting within paragraphs.",
    );
    prompt
}

/// Build the prompt for the requested variant.
pub fn build_prompt(variant: PromptVariant, configs: &[TeamAnalysisConfig]) -> String {
    match variant {
        PromptVariant::Full => build_analysis_prompt(configs),
        PromptVariant::Quick => build_quick_prompt(configs),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
