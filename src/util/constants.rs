// repairlog - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "repairlog";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "repairlog";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input columns
// =============================================================================

/// Header name of the production area column.
pub const COLUMN_AREA: &str = "area";

/// Header name of the machine column (becomes `equipment_group` on output).
pub const COLUMN_MACHINE_NAME: &str = "machine_name";

/// Header name of the mechanism node column (becomes `component` on output).
pub const COLUMN_MECHANISM_NODE: &str = "mechanism_node";

/// Header name of the free-text comments column.
pub const COLUMN_COMMENTS: &str = "comments";

/// Value used for hierarchy columns that are absent from the header row.
pub const UNKNOWN_FIELD: &str = "Unknown";

// =============================================================================
// Extraction patterns
// =============================================================================

/// Captures the "what happened" phrase up to the next semicolon.
pub const PROBLEM_PATTERN: &str = r"Что Произошло:\s*([^;]+)";

/// Captures the "what did you do" phrase up to the next semicolon.
pub const SOLUTION_PATTERN: &str = r"Что ты сделал:\s*([^;]+)";

// =============================================================================
// Output
// =============================================================================

/// Default output document path (relative to the working directory).
pub const DEFAULT_OUTPUT_FILE: &str = "repair_instructions.json";

/// Output path that selects stdout instead of a file.
pub const STDOUT_PATH: &str = "-";

/// Separator placed between distinct solutions of one problem.
pub const DEFAULT_SOLUTION_SEPARATOR: &str = "; ";

/// Maximum accepted length of a configured solution separator.
pub const MAX_SOLUTION_SEPARATOR_LEN: usize = 16;

/// CSV export header, in output field order.
pub const EXPORT_CSV_HEADER: [&str; 5] = ["area", "equipment_group", "component", "problem", "solution"];

// =============================================================================
// Knowledge base queries
// =============================================================================

/// Default number of instructions returned by a keyword search.
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 5;

/// Upper bound on the configurable search result count.
pub const ABSOLUTE_MAX_SEARCH_RESULTS: usize = 100;

/// Keywords shorter than this (in characters) are ignored.
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Function words removed from search queries before keyword matching.
pub const SEARCH_STOP_WORDS: &[&str] = &[
    "что", "как", "где", "когда", "не", "на", "в", "и", "или", "а", "но", "для", "по", "с", "из",
    "к", "от",
];

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a comment included in debug output.
pub const DEBUG_MAX_COMMENT_PREVIEW: usize = 120;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Exit codes
// =============================================================================

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INPUT_NOT_FOUND: i32 = 2;
pub const EXIT_OUTPUT_FAILED: i32 = 3;
