use std::path::PathBuf;
use std::sync::Arc;

use futures::future::{self, join_all};
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use super::{BatchReport, CancellationFlag, ProcessedFile};
use crate::cache::ResultCache;
use crate::shared::config::DEFAULT_BATCH_SIZE;
use crate::shared::{AnalyzerConfig, AppError};

/// Fans replay files out over a bounded worker pool, surfacing results one
/// batch at a time in submission order.
pub struct BatchOrchestrator {
    cache: Arc<ResultCache>,
    batch_size: usize,
    workers: usize,
    refresh: bool,
}

impl BatchOrchestrator {
    pub fn builder(cache: Arc<ResultCache>) -> BatchOrchestratorBuilder {
        BatchOrchestratorBuilder::new(cache)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Lazily processes `paths`. Each batch starts only when the previous one
    /// has been consumed and `cancel` has not been raised; a batch already
    /// running always completes.
    #[instrument(skip(self, paths, cancel), fields(files = paths.len()))]
    pub fn batches(
        &self,
        paths: Vec<PathBuf>,
        cancel: CancellationFlag,
    ) -> BoxStream<'static, BatchReport> {
        let total_files = paths.len();
        let batch_size = self.batch_size;
        let chunks: Vec<Vec<PathBuf>> = paths.chunks(batch_size).map(<[PathBuf]>::to_vec).collect();
        let total_batches = chunks.len();

        info!(
            total_files,
            total_batches,
            batch_size,
            workers = self.workers,
            "Starting replay batch run"
        );

        let worker = BatchWorker {
            cache: self.cache.clone(),
            permits: Arc::new(Semaphore::new(self.workers)),
            refresh: self.refresh,
        };

        stream::iter(chunks.into_iter().enumerate())
            .take_while(move |(batch_index, _)| {
                let cancelled = cancel.is_cancelled();
                if cancelled {
                    info!(
                        skipped_from = *batch_index,
                        total_batches, "Batch run cancelled"
                    );
                }
                future::ready(!cancelled)
            })
            .then(move |(batch_index, chunk)| {
                let worker = worker.clone();
                async move {
                    let files = worker.run(chunk).await;
                    let files_completed =
                        (batch_index * batch_size + files.len()).min(total_files);

                    info!(
                        batch = batch_index + 1,
                        total_batches,
                        files_completed,
                        total_files,
                        "Batch complete"
                    );

                    BatchReport {
                        batch_index,
                        total_batches,
                        files_completed,
                        total_files,
                        files,
                    }
                }
            })
            .boxed()
    }

    /// Runs every batch to completion and returns the files in input order.
    pub async fn process_all(&self, paths: Vec<PathBuf>) -> Vec<ProcessedFile> {
        self.batches(paths, CancellationFlag::new())
            .flat_map(|report| stream::iter(report.files))
            .collect()
            .await
    }
}

#[derive(Clone)]
struct BatchWorker {
    cache: Arc<ResultCache>,
    permits: Arc<Semaphore>,
    refresh: bool,
}

impl BatchWorker {
    async fn run(&self, chunk: Vec<PathBuf>) -> Vec<ProcessedFile> {
        let handles: Vec<_> = chunk
            .iter()
            .cloned()
            .map(|path| {
                let worker = self.clone();
                tokio::spawn(async move { worker.process(path).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(chunk)
            .map(|(joined, path)| match joined {
                Ok(file) => file,
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "Replay worker aborted");
                    ProcessedFile::from_outcome(path, Err(AppError::Task(err.to_string())))
                }
            })
            .collect()
    }

    async fn process(&self, path: PathBuf) -> ProcessedFile {
        // The semaphore is never closed, so acquisition only fails on shutdown.
        let _permit = self.permits.clone().acquire_owned().await.ok();

        let outcome = if self.refresh {
            self.cache.try_recompute(&path).await
        } else {
            self.cache.try_get_or_compute(&path).await
        };

        if let Err(err) = &outcome {
            warn!(file = %path.display(), error = %err, "Replay analysis failed");
        }
        ProcessedFile::from_outcome(path, outcome)
    }
}

pub struct BatchOrchestratorBuilder {
    cache: Arc<ResultCache>,
    batch_size: usize,
    workers: usize,
    refresh: bool,
}

impl BatchOrchestratorBuilder {
    fn new(cache: Arc<ResultCache>) -> Self {
        let defaults = AnalyzerConfig::default();
        Self {
            cache,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: defaults.workers,
            refresh: false,
        }
    }

    /// Takes batch size and worker count from `config`.
    pub fn config(self, config: &AnalyzerConfig) -> Self {
        self.batch_size(config.batch_size).workers(config.workers)
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Re-extract every file instead of reading cached entries.
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn build(self) -> BatchOrchestrator {
        BatchOrchestrator {
            cache: self.cache,
            batch_size: self.batch_size.max(1),
            workers: self.workers.max(1),
            refresh: self.refresh,
        }
    }
}
