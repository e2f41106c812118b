//! Orchestrator behaviour driven by a fake renderer (no Chrome required)

use indicatif::ProgressBar;
use sitesnap::{run_batch, Error, PageRenderer, PageTask, Result, RunConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn task(name: &str) -> PageTask {
    let config = RunConfig {
        site_dir: "/site".to_string(),
        output_dir: "/out".to_string(),
    };
    PageTask::from_source(&format!("/site/{}", name), &config)
}

/// Records concurrency and completions instead of driving a browser
struct FakeRenderer {
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
    rendered: Mutex<Vec<String>>,
    fail_suffix: Option<String>,
}

impl FakeRenderer {
    fn new(fail_suffix: Option<&str>) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
            rendered: Mutex::new(Vec::new()),
            fail_suffix: fail_suffix.map(String::from),
        }
    }
}

impl PageRenderer for FakeRenderer {
    fn render(&self, task: &PageTask) -> Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);
        // Long enough that tasks overlap when more than one worker runs
        thread::sleep(Duration::from_millis(10));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self
            .fail_suffix
            .as_deref()
            .is_some_and(|suffix| task.source_path.ends_with(suffix))
        {
            return Err(Error::Render(format!(
                "simulated failure for {}",
                task.source_path
            )));
        }

        self.rendered.lock().unwrap().push(task.source_path.clone());
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pool_completes_every_task() {
    let tasks: Vec<_> = (0..16).map(|i| task(&format!("page{}.html", i))).collect();
    let fake = Arc::new(FakeRenderer::new(None));
    let renderer: Arc<dyn PageRenderer> = fake.clone();

    let report = run_batch(renderer, tasks, 4, &ProgressBar::hidden()).await;

    assert!(report.is_success());
    assert_eq!(report.completed, 16);
    assert_eq!(fake.rendered.lock().unwrap().len(), 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn pool_never_exceeds_the_worker_cap() {
    let tasks: Vec<_> = (0..12).map(|i| task(&format!("page{}.html", i))).collect();
    let fake = Arc::new(FakeRenderer::new(None));
    let renderer: Arc<dyn PageRenderer> = fake.clone();

    let report = run_batch(renderer, tasks, 3, &ProgressBar::hidden()).await;

    assert_eq!(report.completed, 12);
    assert!(
        fake.high_water.load(Ordering::SeqCst) <= 3,
        "saw {} tasks in flight with a cap of 3",
        fake.high_water.load(Ordering::SeqCst)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_failure_does_not_abort_the_batch() {
    let tasks: Vec<_> = (0..12).map(|i| task(&format!("page{}.html", i))).collect();
    let fake = Arc::new(FakeRenderer::new(Some("page3.html")));
    let renderer: Arc<dyn PageRenderer> = fake.clone();

    let report = run_batch(renderer, tasks, 4, &ProgressBar::hidden()).await;

    assert!(!report.is_success());
    assert_eq!(report.completed, 11);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.source_path.ends_with("page3.html"));
    assert_eq!(fake.rendered.lock().unwrap().len(), 11);
}

#[tokio::test]
async fn empty_task_list_is_a_successful_run() {
    let renderer: Arc<dyn PageRenderer> = Arc::new(FakeRenderer::new(None));
    let report = run_batch(renderer, Vec::new(), 4, &ProgressBar::hidden()).await;

    assert!(report.is_success());
    assert_eq!(report.completed, 0);
}

#[tokio::test]
async fn zero_workers_still_drains_the_queue() {
    let tasks = vec![task("only.html")];
    let renderer: Arc<dyn PageRenderer> = Arc::new(FakeRenderer::new(None));

    let report = run_batch(renderer, tasks, 0, &ProgressBar::hidden()).await;

    assert_eq!(report.completed, 1);
}
