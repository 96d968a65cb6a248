//! Application-level configuration constants.

use crate::CounterConfig;

// Lookup service
pub const LOOKUP_ENDPOINT: &str = "/steam-lookup";
pub const LOOKUP_TIMEOUT_MS: u32 = 15_000;

// Character counters
pub const BIO_LIMIT: usize = 500;
pub const COMMENT_LIMIT: usize = 30;

pub const BIO_COUNTER: CounterConfig = CounterConfig {
    limit: BIO_LIMIT,
    normal_color: "#333",
    warning_color: "red",
};

pub const COMMENT_COUNTER: CounterConfig = CounterConfig {
    limit: COMMENT_LIMIT,
    normal_color: "black",
    warning_color: "red",
};

// Flag images
pub const FLAG_IMAGE_DIR: &str = "/img/flags/";
pub const FLAG_IMAGE_EXT: &str = ".png";

// Default values written by the autofill flow
pub const DEFAULT_PLATFORM: &str = "1";
pub const DEFAULT_FLOOR: u32 = 4;
pub const SCORE_CATEGORY: &str = "1";
pub const SPEED_CATEGORY: &str = "2";
pub const INITIAL_CATEGORY: i32 = 1;

// Element ids
pub const SPELUNKER_IMAGE_ID: &str = "spelunker";
pub const COUNTRY_IMAGE_ID: &str = "flag";
pub const SUBMIT_RUN_ROOT_ID: &str = "submit-run-app";
pub const EDIT_PROFILE_ROOT_ID: &str = "edit-profile-app";

// Validation ranges
pub const MAX_WORLD: u32 = 5;
pub const MAX_FLOOR: u32 = 4;
