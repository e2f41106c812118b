//! Sitesnap
//!
//! Batch-renders screenshots of every HTML page in a static site tree at
//! desktop and mobile viewport sizes, writing PNGs into a mirrored output
//! directory structure. Intended for visually snapshotting a generated site
//! (for example ahead of visual-regression review) without manual browsing.
//!
//! # Pipeline
//!
//! 1. Discover `**/*.html` beneath the site directory
//! 2. Map each file to a `file://` URL and a mirrored output path
//! 3. Render each page in its own headless Chrome tab at two viewport
//!    profiles, desktop first, then mobile
//! 4. Drain the task queue with one worker per logical CPU core, reporting
//!    progress as pages complete
//!
//! # Example
//!
//! ```no_run
//! use sitesnap::{discover_pages, run_batch, BrowserSession, CdpRenderer, PageRenderer, RunConfig};
//! use indicatif::ProgressBar;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = RunConfig {
//!     site_dir: "site".to_string(),
//!     output_dir: "shots".to_string(),
//! };
//! let tasks = discover_pages(&config)?;
//! let renderer: Arc<dyn PageRenderer> = Arc::new(CdpRenderer::new(BrowserSession::launch()?));
//! let progress = ProgressBar::new(tasks.len() as u64);
//! let report = run_batch(renderer, tasks, num_cpus::get(), &progress).await;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod capture;
pub mod discover;
pub mod error;
pub mod task;

pub use batch::{run_batch, BatchReport};
pub use capture::{
    capture_plan, BrowserSession, CdpRenderer, PageRenderer, Shot, ViewportProfile,
};
pub use discover::discover_pages;
pub use error::{Error, Result};
pub use task::{PageTask, RunConfig};
