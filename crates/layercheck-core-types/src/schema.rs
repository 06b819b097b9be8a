//! Canonical schema constants for structured logging
//!
//! These constants keep field keys consistent between the logging macros,
//! the CLI and test assertions.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Collection sizes
pub const FIELD_LAYER_COUNT: &str = "layer_count";
pub const FIELD_RULE_COUNT: &str = "rule_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
