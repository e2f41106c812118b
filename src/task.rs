//! Page task derivation: mapping source HTML files to URLs and output paths

use std::path::Path;

/// Configuration for a single batch run
///
/// Both directories are kept as strings because the output mapping is defined
/// as plain string substitution over the discovered source paths.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root of the generated site to read pages from
    pub site_dir: String,
    /// Root of the mirrored tree screenshots are written to
    pub output_dir: String,
}

/// One unit of work: a source HTML file and its target screenshot paths
///
/// Tasks are independent of each other and fully determined by the source
/// path, so two distinct source files can never collide on output.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTask {
    /// Discovered source file path
    pub source_path: String,
    /// `file://` URL the browser navigates to
    pub source_url: String,
    /// Desktop screenshot path; the mobile variant derives from it
    pub output_path: String,
    /// Whether the file is named exactly `index.html`
    ///
    /// Index pages are typically long landing pages and get an enlarged
    /// viewport instead of full-page capture.
    pub is_index: bool,
}

impl PageTask {
    /// Derive a task from a discovered source file.
    ///
    /// The output path swaps the first occurrence of the site directory for
    /// the output directory, then the trailing `.html` for `.png`. No
    /// separator normalization or URL-encoding is performed; paths whose site
    /// directory is not a literal prefix are a known limitation.
    pub fn from_source(source_path: &str, config: &RunConfig) -> Self {
        let source_url = format!("file://{}", source_path);

        let swapped = source_path.replacen(&config.site_dir, &config.output_dir, 1);
        let output_path = match swapped.strip_suffix(".html") {
            Some(stem) => format!("{}.png", stem),
            None => swapped,
        };

        let is_index = Path::new(source_path)
            .file_name()
            .is_some_and(|name| name == "index.html");

        Self {
            source_path: source_path.to_string(),
            source_url,
            output_path,
            is_index,
        }
    }

    /// Path for the mobile screenshot (`.png` becomes `.mobile.png`)
    pub fn mobile_output_path(&self) -> String {
        match self.output_path.strip_suffix(".png") {
            Some(stem) => format!("{}.mobile.png", stem),
            None => format!("{}.mobile.png", self.output_path),
        }
    }
}
