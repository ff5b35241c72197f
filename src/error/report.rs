use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to create report directory '{path}': {source}")]
    CreateReportDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write report '{path}': {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {source}")]
    SerializeReport {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read report '{path}': {source}")]
    ReadReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse report '{path}': {source}")]
    ParseReport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write comparison '{path}': {source}")]
    WriteComparison {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
