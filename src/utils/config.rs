//! Configuration defaults and constants for the CLI.

/// Current JSON result schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Project code written in the first report column unless configured
pub const DEFAULT_PROJECT_CODE: &str = "N199";

/// File name template for a step extract; `{step}` is the step short code
pub const DEFAULT_FILE_TEMPLATE: &str = "raw-data-download-N199-Housing TI-LDG-{step}.csv";

/// Placeholder substituted with the step short code in the file template
pub const STEP_PLACEHOLDER: &str = "{step}";

/// Extension of step extract files
pub const CSV_EXTENSION: &str = "csv";

// Column headers in the step extracts
pub const DEFAULT_SERIAL_COLUMN: &str = "Serial Number";
pub const DEFAULT_COMPLETED_AT_COLUMN: &str = "Date";

// Pipeline knobs
pub const DEFAULT_WORKERS: usize = 24;
pub const DEFAULT_MAX_OPEN_FILES: usize = 4;
pub const DEFAULT_BUCKET_BOUNDARY: usize = 7;

/// Leading report columns, before the day buckets
pub const REPORT_KEY_COLUMNS: &[&str] = &["ProjectCode", "FromStep", "ToStep"];

/// Timestamp layouts accepted in the completed-at column, tried in order.
/// RFC 3339 is tried before all of these.
pub const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts; the time is taken as midnight
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
