//! Error types for the screenshot batch runner

use thiserror::Error;

/// Result type alias for batch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a batch run
///
/// `Discovery` and `Launch` are fatal and abort before any page is rendered.
/// `Render` and `Io` are raised per page task and are isolated by the
/// orchestrator: the rest of the queue keeps draining.
#[derive(Error, Debug)]
pub enum Error {
    /// Source tree enumeration failed
    #[error("Page discovery failed: {0}")]
    Discovery(String),

    /// The browser process could not be started
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// A single page's navigation, emulation, or capture failed
    #[error("Render failed: {0}")]
    Render(String),

    /// Filesystem failure while preparing or writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
