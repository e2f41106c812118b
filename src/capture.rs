//! Render worker: viewport profiles, capture plans, and the CDP-backed
//! renderer that turns one page task into image files on disk

use crate::task::PageTask;
use crate::{Error, Result};
use base64::Engine as Base64Engine;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

/// Desktop viewport width
pub const DESKTOP_WIDTH: u32 = 1366;
/// Desktop viewport height for ordinary pages
pub const DESKTOP_HEIGHT: u32 = 768;
/// Mobile viewport width
pub const MOBILE_WIDTH: u32 = 411;
/// Mobile viewport height for ordinary pages
pub const MOBILE_HEIGHT: u32 = 731;
/// Viewport height used for index pages in both profiles
///
/// Landing pages are captured viewport-only, so the viewport itself is made
/// tall enough to hold their content.
pub const INDEX_PAGE_HEIGHT: u32 = 3000;

// Upper bound on a single navigation or CDP call so one hung page cannot
// stall a worker forever.
const TAB_TIMEOUT: Duration = Duration::from_secs(60);

/// Simulated window size plus device emulation flags for one capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportProfile {
    pub width: u32,
    pub height: u32,
    /// Emulate a mobile device (affects user agent and touch events)
    pub mobile: bool,
}

impl ViewportProfile {
    /// Desktop profile; index pages get the enlarged height
    pub fn desktop(is_index: bool) -> Self {
        Self {
            width: DESKTOP_WIDTH,
            height: if is_index { INDEX_PAGE_HEIGHT } else { DESKTOP_HEIGHT },
            mobile: false,
        }
    }

    /// Mobile profile; index pages get the enlarged height
    pub fn mobile(is_index: bool) -> Self {
        Self {
            width: MOBILE_WIDTH,
            height: if is_index { INDEX_PAGE_HEIGHT } else { MOBILE_HEIGHT },
            mobile: true,
        }
    }
}

/// One screenshot to take: target path, viewport, and capture mode
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub output_path: String,
    pub viewport: ViewportProfile,
    /// Capture the entire scrollable content rather than the viewport frame
    pub full_page: bool,
}

/// The two captures a task must produce, desktop first, then mobile.
///
/// Ordinary pages use full-page capture; index pages rely on the enlarged
/// viewport height instead and are captured viewport-only.
pub fn capture_plan(task: &PageTask) -> [Shot; 2] {
    [
        Shot {
            output_path: task.output_path.clone(),
            viewport: ViewportProfile::desktop(task.is_index),
            full_page: !task.is_index,
        },
        Shot {
            output_path: task.mobile_output_path(),
            viewport: ViewportProfile::mobile(task.is_index),
            full_page: !task.is_index,
        },
    ]
}

/// Turns one page task into image files on disk.
///
/// The orchestrator only depends on this trait, so batch behaviour can be
/// exercised with a fake renderer in tests.
pub trait PageRenderer: Send + Sync {
    fn render(&self, task: &PageTask) -> Result<()>;
}

/// The single browser process shared by a whole run
///
/// The session is a factory for isolated tabs; each task opens its own tab
/// and closes it when done. Tabs are never shared or reused across tasks.
pub struct BrowserSession {
    browser: Browser,
}

impl BrowserSession {
    /// Launch headless Chrome.
    ///
    /// Sandboxing is disabled: the run only ever renders locally generated,
    /// trusted HTML.
    pub fn launch() -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((DESKTOP_WIDTH, DESKTOP_HEIGHT)))
            .idle_browser_timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| Error::Launch(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::Launch(format!("Failed to launch browser: {}", e)))?;

        Ok(Self { browser })
    }

    /// Open a new isolated tab; the returned guard closes it on drop.
    pub fn open_tab(&self) -> Result<ScopedTab> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| Error::Render(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(TAB_TIMEOUT);
        Ok(ScopedTab { tab })
    }
}

/// An exclusively owned browser tab, closed on every exit path
pub struct ScopedTab {
    tab: Arc<Tab>,
}

impl ScopedTab {
    /// Navigate and wait for the default page-loaded signal.
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::Render(format!("Navigation to {} failed: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Render(format!("Wait for {} failed: {}", url, e)))?;
        Ok(())
    }

    /// Apply a viewport profile through device metrics and touch emulation.
    pub fn emulate(&self, viewport: ViewportProfile) -> Result<()> {
        self.tab
            .call_method(Emulation::SetDeviceMetricsOverride {
                width: viewport.width,
                height: viewport.height,
                device_scale_factor: 1.0,
                mobile: viewport.mobile,
                scale: None,
                screen_width: None,
                screen_height: None,
                position_x: None,
                position_y: None,
                dont_set_visible_size: None,
                screen_orientation: None,
                viewport: None,
                display_feature: None,
                device_posture: None,
            })
            .map_err(|e| Error::Render(format!("Viewport override failed: {}", e)))?;

        self.tab
            .call_method(Emulation::SetTouchEmulationEnabled {
                enabled: viewport.mobile,
                max_touch_points: None,
            })
            .map_err(|e| Error::Render(format!("Touch emulation failed: {}", e)))?;

        Ok(())
    }

    /// Capture the current page as PNG bytes.
    ///
    /// With `full_page` the capture extends beyond the viewport to the whole
    /// scrollable content.
    pub fn capture_png(&self, full_page: bool) -> Result<Vec<u8>> {
        let shot = self
            .tab
            .call_method(Page::CaptureScreenshot {
                format: Some(Page::CaptureScreenshotFormatOption::Png),
                quality: None,
                clip: None,
                from_surface: Some(true),
                capture_beyond_viewport: Some(full_page),
                optimize_for_speed: None,
            })
            .map_err(|e| Error::Render(format!("Screenshot failed: {}", e)))?;

        base64::engine::general_purpose::STANDARD
            .decode(shot.data)
            .map_err(|e| Error::Render(format!("Screenshot decode failed: {}", e)))
    }
}

impl Drop for ScopedTab {
    fn drop(&mut self) {
        // Runs on the error path too; a leaked tab would accumulate browser
        // memory over a long batch.
        if let Err(e) = self.tab.close(true) {
            warn!("Failed to close tab: {}", e);
        }
    }
}

/// Renders page tasks through a shared headless Chrome session
pub struct CdpRenderer {
    session: BrowserSession,
}

impl CdpRenderer {
    pub fn new(session: BrowserSession) -> Self {
        Self { session }
    }
}

impl PageRenderer for CdpRenderer {
    fn render(&self, task: &PageTask) -> Result<()> {
        if let Some(parent) = std::path::Path::new(&task.output_path).parent() {
            fs::create_dir_all(parent)?;
        }

        let tab = self.session.open_tab()?;
        tab.navigate(&task.source_url)?;

        for shot in capture_plan(task) {
            tab.emulate(shot.viewport)?;
            let png = tab.capture_png(shot.full_page)?;
            fs::write(&shot.output_path, png)?;
            debug!("wrote {}", shot.output_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::RunConfig;

    fn task(path: &str) -> PageTask {
        let config = RunConfig {
            site_dir: "/site".to_string(),
            output_dir: "/out".to_string(),
        };
        PageTask::from_source(path, &config)
    }

    #[test]
    fn desktop_profile_dimensions() {
        assert_eq!(
            ViewportProfile::desktop(false),
            ViewportProfile { width: 1366, height: 768, mobile: false }
        );
        assert_eq!(
            ViewportProfile::desktop(true),
            ViewportProfile { width: 1366, height: 3000, mobile: false }
        );
    }

    #[test]
    fn mobile_profile_dimensions() {
        assert_eq!(
            ViewportProfile::mobile(false),
            ViewportProfile { width: 411, height: 731, mobile: true }
        );
        assert_eq!(
            ViewportProfile::mobile(true),
            ViewportProfile { width: 411, height: 3000, mobile: true }
        );
    }

    #[test]
    fn ordinary_pages_use_full_page_capture() {
        let plan = capture_plan(&task("/site/about/team.html"));
        assert!(plan[0].full_page);
        assert!(plan[1].full_page);
        assert_eq!(plan[0].output_path, "/out/about/team.png");
        assert_eq!(plan[1].output_path, "/out/about/team.mobile.png");
    }

    #[test]
    fn index_pages_are_captured_viewport_only() {
        let plan = capture_plan(&task("/site/index.html"));
        assert!(!plan[0].full_page);
        assert!(!plan[1].full_page);
        assert_eq!(plan[0].viewport.height, INDEX_PAGE_HEIGHT);
        assert_eq!(plan[1].viewport.height, INDEX_PAGE_HEIGHT);
    }

    #[test]
    fn desktop_shot_comes_before_mobile() {
        let plan = capture_plan(&task("/site/page.html"));
        assert!(!plan[0].viewport.mobile);
        assert!(plan[1].viewport.mobile);
    }
}
