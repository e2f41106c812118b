//! Source tree enumeration

use crate::task::{PageTask, RunConfig};
use crate::{Error, Result};
use log::debug;
use std::path::Path;

/// Expand `**/*.html` beneath the configured site directory into page tasks.
///
/// Results are sorted by source path so the progress total and ordering are
/// reproducible within a run. Fails fast when the directory is missing or an
/// entry cannot be read.
pub fn discover_pages(config: &RunConfig) -> Result<Vec<PageTask>> {
    if !Path::new(&config.site_dir).is_dir() {
        return Err(Error::Discovery(format!(
            "Source directory {} does not exist or is not a directory",
            config.site_dir
        )));
    }

    let pattern = format!("{}/**/*.html", config.site_dir);
    let entries = glob::glob(&pattern)
        .map_err(|e| Error::Discovery(format!("Invalid glob pattern {}: {}", pattern, e)))?;

    let mut pages = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            Error::Discovery(format!("Unreadable entry under {}: {}", config.site_dir, e))
        })?;
        let source = path.to_string_lossy().into_owned();
        debug!("discovered {}", source);
        pages.push(PageTask::from_source(&source, config));
    }

    pages.sort_by(|a, b| a.source_path.cmp(&b.source_path));
    Ok(pages)
}
