//! Application constants and configuration

pub const APP_NAME: &str = "LovelyStock Gallery";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default CSV listing every image (url, title)
pub const DEFAULT_CSV_URL: &str = "https://slf09sd.github.io/lovelystock/images.csv";

/// Records per gallery page
pub const PAGE_SIZE: usize = 100;

/// Title keywords boosted by the keyword-curated default view
pub const DEFAULT_KEYWORDS: &[&str] = &["love", "heart"];

/// URL prefixes accepted when URL validation is enabled
pub const URL_SCHEMES: &[&str] = &["https://", "http://"];

/// Delay between the last keystroke and the search running
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Concurrent thumbnail requests
pub const THUMBNAIL_CONCURRENCY: usize = 8;

/// Longest edge of a decoded thumbnail, in pixels
pub const THUMBNAIL_MAX_EDGE: u32 = 320;

/// Longest edge of the popup image, in pixels
pub const POPUP_MAX_EDGE: u32 = 1600;

/// The single message shown for any failed catalog load
pub const LOAD_FAILED_MESSAGE: &str = "Failed loading images";
