// Env values used in thumbor services.
pub const THUMBOR_SERVER: &str = "THUMBOR_SERVER";
pub const THUMBOR_KEY: &str = "THUMBOR_KEY";

/// Server used when neither config nor env provide one.
pub const DEFAULT_SERVER: &str = "http://localhost:8888";

/// Signature placeholder for URLs built without a secret.
pub const UNSAFE: &str = "unsafe";

// Literal path segments.
pub const SEGMENT_META: &str = "meta";
pub const SEGMENT_TRIM: &str = "trim";
pub const SEGMENT_SMART: &str = "smart";
pub const SEGMENT_FILTERS: &str = "filters";
pub const DIMENSION_ORIG: &str = "orig";
