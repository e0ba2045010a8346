pub mod llm;
pub mod prompt;
pub mod report;
pub mod response;
pub mod scanner;

pub use llm::{client_for, LlmClient, LlmSettings, NoopLlmClient, OpenAiClient};
pub use report::{render_report, OutputFormat};
pub use response::parse_findings;
pub use scanner::{
    default_auditor::DefaultAuditor, file_repository::WalkdirSourceRepository, Auditor, FileReport,
    FilterError, Finding, ScanFilter, Severity, SourceRepository, WcagLevel, WcagVersion,
};
