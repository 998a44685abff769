pub mod exporter;
pub mod prompt;

pub use exporter::{ExportConfig, ExportError, ReportExporter, DEFAULT_ENDPOINT};
pub use prompt::{build_request, patient_summary, Content, GenerateContentRequest, Part};
