//! Batch orchestration: a bounded pool of workers draining a shared task queue

use crate::capture::PageRenderer;
use crate::task::PageTask;
use crate::{Error, Result};
use futures::future;
use indicatif::ProgressBar;
use log::{debug, error};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Outcome of a whole batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Tasks whose screenshots were all written
    pub completed: usize,
    /// Tasks that failed, with their errors
    pub failed: Vec<(PageTask, Error)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drive every task to completion with at most `workers` pages in flight.
///
/// Workers pull from a shared queue, so at no point are more than `workers`
/// tabs open. Each blocking browser interaction runs on the blocking pool;
/// completions flow back over a channel to the single control flow that owns
/// the progress bar, which keeps progress increments race-free.
///
/// One page's failure is isolated: it is logged, recorded in the report, and
/// the rest of the queue keeps draining.
pub async fn run_batch(
    renderer: Arc<dyn PageRenderer>,
    tasks: Vec<PageTask>,
    workers: usize,
    progress: &ProgressBar,
) -> BatchReport {
    let total = tasks.len();
    let queue = Arc::new(Mutex::new(VecDeque::from(tasks)));
    let (tx, mut rx) = mpsc::unbounded_channel::<(PageTask, Result<()>)>();

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers.max(1) {
        let queue = Arc::clone(&queue);
        let renderer = Arc::clone(&renderer);
        let tx = tx.clone();
        handles.push(tokio::spawn(async move {
            loop {
                // Pop before awaiting so the lock is never held across a
                // suspension point.
                let task = queue.lock().expect("task queue poisoned").pop_front();
                let Some(task) = task else { break };

                let renderer = Arc::clone(&renderer);
                let job = task.clone();
                let result =
                    match tokio::task::spawn_blocking(move || renderer.render(&job)).await {
                        Ok(result) => result,
                        Err(e) => Err(Error::Render(format!("Render worker panicked: {}", e))),
                    };

                if tx.send((task, result)).is_err() {
                    break;
                }
            }
        }));
    }
    drop(tx);

    let mut report = BatchReport::default();
    while let Some((task, result)) = rx.recv().await {
        match result {
            Ok(()) => {
                report.completed += 1;
                debug!("finished {}", task.source_path);
            }
            Err(e) => {
                error!("{}: {}", task.source_path, e);
                report.failed.push((task, e));
            }
        }
        progress.inc(1);
    }

    future::join_all(handles).await;
    debug_assert_eq!(report.completed + report.failed.len(), total);
    report
}
