use crate::scanner::{WcagLevel, WcagVersion};

/// Fixed system instruction sent with every audit request.
pub const SYSTEM_PROMPT: &str = "You are an expert accessibility auditor.";

/// Sampling temperature for audit calls. Low on purpose: the response
/// must stay machine-parseable JSON.
pub const AUDIT_TEMPERATURE: f32 = 0.3;

/// The two message bodies sent to a completion endpoint for one file.
#[derive(Debug, Clone)]
pub struct AuditPrompt {
    pub system: String,
    pub user: String,
}

/// Prefix each line with a right-aligned, 1-based line number so the
/// model can report `line_numbers` that match the source.
pub fn number_lines(content: &str) -> String {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| format!("{:4}: {}", idx + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the per-file audit prompt embedding the numbered content and
/// the requested WCAG parameters.
pub fn build_audit_prompt(
    file_name: &str,
    content: &str,
    level: WcagLevel,
    version: WcagVersion,
) -> AuditPrompt {
    let numbered = number_lines(content);
    let user = format!(
        r#"You are an expert in web accessibility and WCAG compliance.

The following code includes line numbers.

Scan the code and return **only valid JSON** with this structure:
[
  {{
    "title": "Short title of the issue",
    "issue_type": "Type/category of the issue (e.g., Contrast, Alt Text, Keyboard Navigation)",
    "description": "Detailed description of the issue",
    "line_numbers": [list of affected lines],
    "code_snippet": "Relevant code snippet",
    "suggestion": "AI-based suggestion to fix it",
    "severity": "High | Medium | Low"
  }}
]

Rules:
- Do not include any extra text outside JSON.
- Severity should be based on WCAG impact.
- If no issues found, return [].

WCAG Version: {version}
Accessibility Level: {level}

File: {file_name}
----------------------
{numbered}
"#
    );

    AuditPrompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}
