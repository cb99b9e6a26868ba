//! Parallel feature execution
//!
//! One task per feature file, with a counting semaphore capping how many
//! run at once. A failing feature never holds up or cancels the others;
//! only a fatal executor error stops the run.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use super::runner::{ExecError, ProcessExecutor};
use crate::models::TestUnit;

/// Something that can execute one test unit
pub trait UnitExecutor: Send + Sync + 'static {
    fn execute(&self, unit: TestUnit) -> impl Future<Output = Result<(), ExecError>> + Send;
}

impl UnitExecutor for ProcessExecutor {
    fn execute(&self, unit: TestUnit) -> impl Future<Output = Result<(), ExecError>> + Send {
        ProcessExecutor::execute(self, unit)
    }
}

/// Bounded-concurrency scheduler
pub struct Scheduler {
    max_concurrent: usize,
}

impl Scheduler {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Execute every unit exactly once and wait for all of them.
    ///
    /// Returns the number of units executed. On a fatal error the remaining
    /// tasks are aborted and the error is returned.
    pub async fn run<E: UnitExecutor>(
        &self,
        units: Vec<TestUnit>,
        executor: Arc<E>,
    ) -> Result<usize, ExecError> {
        info!(
            "Running {} feature files (max {} concurrent)",
            units.len(),
            self.max_concurrent
        );

        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for unit in units {
            let semaphore = Arc::clone(&semaphore);
            let executor = Arc::clone(&executor);

            tasks.spawn(async move {
                // The semaphore is only closed when the run is aborted
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Ok(());
                };
                executor.execute(unit).await
            });
        }

        let mut completed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => completed += 1,
                Ok(Err(e)) => {
                    error!("Aborting run: {}", e);
                    semaphore.close();
                    tasks.shutdown().await;
                    return Err(e);
                }
                Err(e) => {
                    error!("Worker task failed: {}", e);
                    completed += 1;
                }
            }
        }

        info!(
            "Parallel execution completed in {}ms",
            start.elapsed().as_millis()
        );

        Ok(completed)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(crate::config::default_concurrency())
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records how often each unit ran and the peak number in flight
    #[derive(Default)]
    struct TrackingExecutor {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        runs: Mutex<HashMap<TestUnit, usize>>,
    }

    impl UnitExecutor for TrackingExecutor {
        async fn execute(&self, unit: TestUnit) -> Result<(), ExecError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            *self.runs.lock().unwrap().entry(unit).or_default() += 1;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Fails fatally on one specific unit
    struct BrokenExecutor {
        runs: AtomicUsize,
    }

    impl UnitExecutor for BrokenExecutor {
        async fn execute(&self, unit: TestUnit) -> Result<(), ExecError> {
            if unit == PathBuf::from("broken.feature") {
                return Err(ExecError::Spawn {
                    bin: PathBuf::from("bin/behat"),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                });
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn units(n: usize) -> Vec<TestUnit> {
        (0..n)
            .map(|i| PathBuf::from(format!("features/{i}.feature")))
            .collect()
    }

    #[test]
    fn test_scheduler_creation() {
        assert_eq!(Scheduler::new(8).max_concurrent(), 8);
        assert_eq!(Scheduler::new(0).max_concurrent(), 1);
        assert!(Scheduler::default().max_concurrent() >= 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_unit_once_within_limit() {
        for limit in [1, 3, 8] {
            let executor = Arc::new(TrackingExecutor::default());
            let completed = Scheduler::new(limit)
                .run(units(25), Arc::clone(&executor))
                .await
                .unwrap();

            assert_eq!(completed, 25);
            let runs = executor.runs.lock().unwrap();
            assert_eq!(runs.len(), 25);
            assert!(runs.values().all(|&n| n == 1));
            assert!(executor.peak.load(Ordering::SeqCst) <= limit);
        }
    }

    #[tokio::test]
    async fn test_empty_unit_list() {
        let executor = Arc::new(TrackingExecutor::default());
        let completed = Scheduler::new(4).run(Vec::new(), executor).await.unwrap();
        assert_eq!(completed, 0);
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_run() {
        let executor = Arc::new(BrokenExecutor {
            runs: AtomicUsize::new(0),
        });
        let mut all = units(10);
        all.insert(0, PathBuf::from("broken.feature"));

        let err = Scheduler::new(1)
            .run(all, Arc::clone(&executor))
            .await
            .unwrap_err();

        assert!(err.is_fatal());
        assert!(executor.runs.load(Ordering::SeqCst) < 10);
    }
}
