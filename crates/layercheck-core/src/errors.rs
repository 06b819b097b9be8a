use thiserror::Error;

/// Result type alias using LayerCheckError
pub type Result<T> = std::result::Result<T, LayerCheckError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// test assertions and the CLI's error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input parsing
    InvalidRuleSet,
    InvalidColorCode,
    InvalidDocument,
    InvalidConfig,

    // Store lookups
    NotFound,

    // Comparison
    /// A comparison result failed its serialization round-trip check
    DeterminismViolation,

    // Integration
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidRuleSet => "ERR_INVALID_RULE_SET",
            ExErrorKind::InvalidColorCode => "ERR_INVALID_COLOR_CODE",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (layer template, version id, ...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for layercheck operations
///
/// Validation and comparison never fail; these errors come from parsing
/// caller input, loading configuration and looking up stored versions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerCheckError {
    /// Rule file is structurally unusable
    #[error("Invalid rule set: {reason}")]
    InvalidRuleSet { reason: String },

    /// A rule's color code could not be interpreted
    #[error("Invalid color code '{code}' for layer template {template}")]
    InvalidColorCode { template: String, code: String },

    /// Parsed document violates the document model
    #[error("Invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// Configuration could not be loaded
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Version is not present in the store
    #[error("Version not found: {version_id}")]
    VersionNotFound { version_id: String },

    /// Reading or writing a caller-supplied file failed
    #[error("cannot {action} {path}: {message}")]
    Io {
        action: &'static str,
        path: String,
        message: String,
    },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Failure that fits no other kind
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<LayerCheckError> for ExError {
    fn from(err: LayerCheckError) -> Self {
        match err {
            LayerCheckError::InvalidRuleSet { reason } => {
                ExError::new(ExErrorKind::InvalidRuleSet).with_message(reason)
            }

            LayerCheckError::InvalidColorCode { template, code } => {
                ExError::new(ExErrorKind::InvalidColorCode)
                    .with_entity_id(template)
                    .with_message(format!("Unrecognised color code '{}'", code))
            }

            LayerCheckError::InvalidDocument { reason } => {
                ExError::new(ExErrorKind::InvalidDocument).with_message(reason)
            }

            LayerCheckError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            LayerCheckError::VersionNotFound { version_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(version_id)
                    .with_message("Version not found")
            }

            LayerCheckError::Io { action, path, message } => ExError::new(ExErrorKind::Io)
                .with_op(action)
                .with_entity_id(path)
                .with_message(message),

            LayerCheckError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            LayerCheckError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to LayerCheckError
impl From<serde_json::Error> for LayerCheckError {
    fn from(err: serde_json::Error) -> Self {
        LayerCheckError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from toml::de::Error to LayerCheckError
impl From<toml::de::Error> for LayerCheckError {
    fn from(err: toml::de::Error) -> Self {
        LayerCheckError::InvalidConfig {
            reason: err.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidRuleSet, "ERR_INVALID_RULE_SET"),
            (ExErrorKind::InvalidColorCode, "ERR_INVALID_COLOR_CODE"),
            (ExErrorKind::InvalidDocument, "ERR_INVALID_DOCUMENT"),
            (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::Io, "ERR_IO"),
            (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_code_op_and_entity() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("get_version")
            .with_entity_id("v9")
            .with_message("Version not found");
        let s = err.to_string();
        assert!(s.starts_with("[ERR_NOT_FOUND]"));
        assert!(s.contains("get_version"));
        assert!(s.contains("v9"));
    }
}
