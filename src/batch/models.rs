use std::path::PathBuf;

use crate::replay::FileResult;
use crate::shared::AppError;

/// Outcome of one file in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub path: PathBuf,
    pub file_name: String,
    /// The extracted result, or the empty sentinel when `error` is set.
    pub result: FileResult,
    pub error: Option<String>,
}

impl ProcessedFile {
    pub fn from_outcome(path: PathBuf, outcome: Result<FileResult, AppError>) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match outcome {
            Ok(result) => Self {
                path,
                file_name,
                result,
                error: None,
            },
            Err(err) => Self {
                path,
                file_name,
                result: FileResult::empty(),
                error: Some(err.to_string()),
            },
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// One surfaced batch plus the progress it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Zero-based.
    pub batch_index: usize,
    pub total_batches: usize,
    /// Files finished across this and all earlier batches.
    pub files_completed: usize,
    pub total_files: usize,
    pub files: Vec<ProcessedFile>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &ProcessedFile> {
        self.files.iter().filter(|file| !file.succeeded())
    }
}
