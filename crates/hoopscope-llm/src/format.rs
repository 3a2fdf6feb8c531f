// Response formatter: turns the model's markdown-subset reply into
// block-level sections for rendering.
//
// Line-oriented, single pass. Blank lines are dropped; every other line
// becomes exactly one section. Inline `**bold**` markers are left in place
// for the presentation layer, which can split them with `inline_spans`.

/// Block (and inline) section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// `# ` line.
    Title,
    /// `## ` line.
    Subtitle,
    /// `### ` line.
    Heading,
    /// `• ` or `- ` line.
    Bullet,
    Paragraph,
    /// Never produced by `format_response`; marks the bold runs returned by
    /// `inline_spans`.
    Emphasis,
    /// A line wrapped in single backticks.
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    pub kind: SectionKind,
    pub text: String,
}

impl ContentSection {
    pub fn new(kind: SectionKind, text: impl Into<String>) -> Self {
        ContentSection {
            kind,
            text: text.into(),
        }
    }
}

/// Prefix rules, checked in order. Longer heading markers never match a
/// shorter rule because each rule includes the trailing space.
const PREFIX_RULES: &[(&str, SectionKind)] = &[
    ("# ", SectionKind::Title),
    ("## ", SectionKind::Subtitle),
    ("### ", SectionKind::Heading),
    ("\u{2022} ", SectionKind::Bullet),
    ("- ", SectionKind::Bullet),
];

/// Parse a reply into sections. Total: any input, including the empty
/// string, yields a (possibly empty) section list.
pub fn format_response(text: &str) -> Vec<ContentSection> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect()
}

fn classify_line(line: &str) -> ContentSection {
    for (prefix, kind) in PREFIX_RULES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return ContentSection::new(*kind, rest);
        }
    }

    if let Some(code) = strip_code_ticks(line) {
        return ContentSection::new(SectionKind::Code, code);
    }

    ContentSection::new(SectionKind::Paragraph, line)
}

/// Inner text of a line wrapped in exactly one backtick on each side.
/// Fences like "```" and double-tick spans are not code lines.
fn strip_code_ticks(line: &str) -> Option<&str> {
    if line.len() < 2 {
        return None;
    }
    let inner = line.strip_prefix('`')?.strip_suffix('`')?;
    if inner.starts_with('`') || inner.ends_with('`') {
        return None;
    }
    Some(inner)
}

/// Split a paragraph or bullet body on `**` markers into plain
/// (`Paragraph`) and bold (`Emphasis`) runs. An unmatched trailing `**` is
/// kept as literal text.
pub fn inline_spans(text: &str) -> Vec<ContentSection> {
    let mut spans = Vec::new();
    let mut rest = text;
    let mut bold = false;

    while let Some(idx) = rest.find("**") {
        let (before, after) = (&rest[..idx], &rest[idx + 2..]);
        if !bold && !after.contains("**") {
            break;
        }
        push_span(&mut spans, before, bold);
        bold = !bold;
        rest = after;
    }
    push_span(&mut spans, rest, bold);
    spans
}

fn push_span(spans: &mut Vec<ContentSection>, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    let kind = if bold {
        SectionKind::Emphasis
    } else {
        SectionKind::Paragraph
    };
    spans.push(ContentSection::new(kind, text));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
