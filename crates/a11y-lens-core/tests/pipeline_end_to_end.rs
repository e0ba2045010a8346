use std::{fs, path::Path, sync::Arc};

use a11y_lens_core::prompt::AuditPrompt;
use a11y_lens_core::{
    render_report, DefaultAuditor, LlmClient, NoopLlmClient, OutputFormat, ScanFilter,
    WalkdirSourceRepository, WcagLevel, WcagVersion,
};
use anyhow::Result;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Replays the model output for `index.html` and reports everything
/// else clean, asserting on the prompt shape along the way.
#[derive(Debug)]
struct ScriptedClient;

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, prompt: &AuditPrompt) -> Result<String> {
        assert!(prompt.user.contains("WCAG Version: 2.1"));
        assert!(prompt.user.contains("Accessibility Level: AA"));
        if prompt.user.contains("File: index.html") {
            Ok(r#"```json
[
  {
    "title": "Image missing alt text",
    "issue_type": "Alt Text",
    "description": "The logo image has no alternative text.",
    "line_numbers": [2],
    "code_snippet": "<img src=\"logo.png\">",
    "suggestion": "Add alt=\"Company logo\".",
    "severity": "High"
  }
]
```"#
                .to_string())
        } else {
            Ok("[]".to_string())
        }
    }
}

fn fixture_tree() -> tempfile::TempDir {
    let temp = tempfile::tempdir().unwrap();
    write(
        &temp.path().join("index.html"),
        "<html>\n<img src=\"logo.png\">\n</html>",
    );
    write(&temp.path().join("styles/site.css"), "body { color: #222; }");
    write(
        &temp.path().join("node_modules/pkg/ui.jsx"),
        "export default null;",
    );
    write(&temp.path().join("README.md"), "ignored");
    temp
}

#[tokio::test(flavor = "current_thread")]
async fn scan_discovers_audits_and_renders() {
    let temp = fixture_tree();
    let repo = Arc::new(WalkdirSourceRepository::with_filter(
        temp.path(),
        ScanFilter::default(),
    ));
    let auditor = DefaultAuditor::new(
        repo,
        Arc::new(ScriptedClient),
        WcagLevel::AA,
        WcagVersion::V2_1,
    );

    let mut reports = auditor.audit_all().await.unwrap();
    reports.sort_by(|a, b| a.path.cmp(&b.path));
    assert_eq!(reports.len(), 2, "node_modules and README must be skipped");

    let html = reports
        .iter()
        .find(|r| r.path.ends_with("index.html"))
        .unwrap();
    assert_eq!(html.findings.len(), 1);
    assert_eq!(html.findings[0].line_numbers, vec![2]);

    let css = reports
        .iter()
        .find(|r| r.path.ends_with("styles/site.css"))
        .unwrap();
    assert!(css.findings.is_empty());

    let table = render_report(html, OutputFormat::Table).unwrap();
    assert!(table.contains("Image missing alt text"));
    let clean = render_report(css, OutputFormat::List).unwrap();
    assert!(clean.contains("No accessibility issues found."));
}

#[tokio::test(flavor = "current_thread")]
async fn clean_tree_reports_zero_findings_per_file() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("a.html"), "<p>fine</p>");
    write(&temp.path().join("b.twig"), "{{ title }}");

    let repo = Arc::new(WalkdirSourceRepository::new(temp.path()));
    let auditor = DefaultAuditor::new(
        repo,
        Arc::new(NoopLlmClient),
        WcagLevel::A,
        WcagVersion::V2_0,
    );
    let reports = auditor.audit_all().await.unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.findings.is_empty()));
}

#[tokio::test(flavor = "current_thread")]
async fn json_format_round_trips_through_serde() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("page.html"), "<img src=\"x.png\">");

    let repo = Arc::new(WalkdirSourceRepository::new(temp.path()));
    let auditor = DefaultAuditor::new(
        repo,
        Arc::new(ScriptedClient),
        WcagLevel::AA,
        WcagVersion::V2_1,
    );
    let reports = auditor.audit_all().await.unwrap();
    let json = render_report(&reports[0], OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["findings"].is_array());
}
