//! Run coordinator - the extraction state machine
//!
//! The coordinator owns a run from start to finish:
//! - Checking the access policy once
//! - Resolving the identifier catalog
//! - Keeping at most `workers` extraction tasks in flight
//! - Routing every finished row to the sink, from this one loop
//! - Stopping cleanly on interrupt

use crate::config::Config;
use crate::miner::worker::{extract_one, Failure, FailureReason, Outcome, WorkerContext};
use crate::miner::{build_http_client, resolve_all};
use crate::output::{progress_line, RunSummary};
use crate::robots::check_access;
use crate::state::RunPhase;
use crate::storage::{open_sink, RecordSink};
use crate::GastroError;
use futures::FutureExt;
use reqwest::Client;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Main extraction coordinator
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    sink: Arc<dyn RecordSink>,
    phase: RunPhase,
}

impl Coordinator {
    /// Creates a coordinator writing to the configured CSV file
    ///
    /// The output file is created (and truncated) here, before any network
    /// traffic, so a run that cannot store its rows never starts.
    pub fn new(config: Config) -> Result<Self, GastroError> {
        let sink = open_sink(Path::new(&config.output.csv_path), &config.header())?;
        tracing::info!("Writing rows to {}", sink.path().display());
        Self::with_sink(config, Arc::new(sink))
    }

    /// Creates a coordinator writing to an arbitrary sink
    pub fn with_sink(config: Config, sink: Arc<dyn RecordSink>) -> Result<Self, GastroError> {
        let client = build_http_client(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
            sink,
            phase: RunPhase::Idle,
        })
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Runs to completion, stopping early on Ctrl+C
    pub async fn run(&mut self) -> Result<RunSummary, GastroError> {
        self.run_until(async {
            if tokio::signal::ctrl_c().await.is_err() {
                tracing::warn!("Could not listen for Ctrl+C; interrupt is disabled");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Runs to completion, stopping early when `shutdown` resolves
    ///
    /// An interrupt is not an error: the summary comes back with
    /// `interrupted` set and the phase `Aborted`. Rows already written stay
    /// in the file; tasks still in flight are cancelled and their results
    /// never reach the sink.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<RunSummary, GastroError>
    where
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        let result = self.execute(shutdown, started).await;

        if let Err(e) = &result {
            tracing::error!("Run aborted during {} phase: {}", e.phase(), e);
            if self.phase.is_extracting() {
                tracing::warn!("Rows written before the failure are kept");
            }
            if !self.phase.is_terminal() {
                self.phase = RunPhase::Aborted;
            }
        }

        result
    }

    async fn execute<F>(&mut self, shutdown: F, started: Instant) -> Result<RunSummary, GastroError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let prepared = tokio::select! {
            biased;
            _ = &mut shutdown => None,
            ids = self.prepare() => Some(ids?),
        };
        let Some(ids) = prepared else {
            tracing::warn!("Interrupted before extraction started");
            return Ok(self.interrupt(RunSummary::new(0), started));
        };

        let total = ids.len();
        let workers = self.config.engine.workers as usize;
        let ctx = Arc::new(WorkerContext::new(self.client.clone(), &self.config));
        let mut summary = RunSummary::new(total);
        let mut pending = ids.into_iter();
        let mut tasks: JoinSet<Outcome> = JoinSet::new();

        tracing::info!(
            "Extracting {} identifiers with {} workers ({:?} throttle)",
            total,
            workers,
            ctx.throttle
        );
        self.advance(RunPhase::Dispatching)?;

        loop {
            while tasks.len() < workers {
                match pending.next() {
                    Some(id) => spawn_extraction(&mut tasks, Arc::clone(&ctx), id),
                    None => break,
                }
            }
            if self.phase == RunPhase::Dispatching && pending.len() == 0 {
                self.advance(RunPhase::Draining)?;
            }

            let joined = tokio::select! {
                joined = tasks.join_next() => Some(joined),
                _ = &mut shutdown => None,
            };
            let Some(joined) = joined else {
                tracing::warn!("Interrupted; abandoning {} in-flight tasks", tasks.len());
                tasks.abort_all();
                return Ok(self.interrupt(summary, started));
            };

            let outcome = match joined {
                Some(Ok(outcome)) => outcome,
                Some(Err(e)) => Err(Failure::new(
                    "<unknown>",
                    FailureReason::Unexpected(e.to_string()),
                )),
                None => break,
            };

            let progress_due = match outcome {
                Ok(row) => {
                    self.sink.append(&row)?;
                    summary.record_success()
                }
                Err(failure) => {
                    tracing::warn!("Skipping {}", failure);
                    summary.record_failure(failure)
                }
            };

            if progress_due {
                tracing::info!("{}", progress_line(summary.completed, total));
            }
        }

        self.advance(RunPhase::Done)?;
        summary.phase = self.phase;
        summary.elapsed = started.elapsed();

        tracing::info!(
            "Extraction complete: {} rows written, {} failures in {:?}",
            self.sink.rows_written(),
            summary.failed(),
            summary.elapsed
        );
        Ok(summary)
    }

    /// Policy check and catalog resolution
    async fn prepare(&mut self) -> Result<Vec<String>, GastroError> {
        let endpoint = self.config.endpoint.url.clone();
        let policy_url = self.config.endpoint.robots_url.clone();

        let policy = check_access(
            &self.client,
            &self.config.user_agent(),
            &endpoint,
            &policy_url,
        )
        .await;
        if !policy.verdict.permits() {
            return Err(GastroError::AccessDenied {
                policy_url,
                target_url: endpoint,
            });
        }
        if let Some(delay) = policy.crawl_delay {
            if delay > self.config.throttle().as_secs_f64() {
                tracing::warn!(
                    "robots.txt asks for a {}s crawl delay, longer than the configured {:?} throttle",
                    delay,
                    self.config.throttle()
                );
            }
        }
        tracing::info!("Access policy verdict: {:?}", policy.verdict);
        self.advance(RunPhase::PolicyChecked)?;

        let ids = resolve_all(&self.client, &endpoint).await?;
        self.advance(RunPhase::CatalogResolved)?;
        Ok(ids)
    }

    fn interrupt(&mut self, mut summary: RunSummary, started: Instant) -> RunSummary {
        self.phase = RunPhase::Aborted;
        summary.interrupted = true;
        summary.phase = self.phase;
        summary.elapsed = started.elapsed();
        summary
    }

    fn advance(&mut self, next: RunPhase) -> Result<(), GastroError> {
        if !self.phase.can_transition_to(next) {
            return Err(GastroError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Run phase: {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

/// Spawns one extraction; a panicking worker becomes an `Unexpected` failure
fn spawn_extraction(tasks: &mut JoinSet<Outcome>, ctx: Arc<WorkerContext>, id: String) {
    tasks.spawn(async move {
        let outcome = AssertUnwindSafe(extract_one(&ctx, &id)).catch_unwind().await;
        outcome.unwrap_or_else(|_| {
            Err(Failure::new(
                id,
                FailureReason::Unexpected("worker panicked".to_string()),
            ))
        })
    });
}

/// Runs a complete extraction
///
/// This is the main entry point for a run. It will:
/// 1. Create the output file and write the header
/// 2. Check the access policy
/// 3. Resolve the identifier catalog
/// 4. Extract every identifier with the configured worker pool
/// 5. Return the run summary
///
/// Ctrl+C stops the run early; the summary then reports it as interrupted.
pub async fn run_extraction(config: Config) -> Result<RunSummary, GastroError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
