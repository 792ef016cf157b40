use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ToolMissing,
    ToolFailed,

    PlatformInvalid,
    BuildArtifactMissing,

    ConfigInvalid,

    InternalIoError,
    InternalJsonError,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub hints: Vec<String>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn tool_missing(tool: &str) -> Self {
        Self::new(
            ErrorCode::ToolMissing,
            format!("{} is not installed or not in PATH", tool),
        )
    }

    pub fn tool_failed(context: &str, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let message = if detail.trim().is_empty() {
            format!("{} failed", context)
        } else {
            format!("{} failed: {}", context, detail.trim())
        };
        Self::new(ErrorCode::ToolFailed, message)
    }

    pub fn platform_invalid(spec: &str) -> Self {
        Self::new(
            ErrorCode::PlatformInvalid,
            format!("'{}' is not a valid target platform", spec),
        )
    }

    pub fn artifact_missing(path: &Path) -> Self {
        Self::new(
            ErrorCode::BuildArtifactMissing,
            format!("Binary was not created: {}", path.display()),
        )
    }

    pub fn config_invalid(path: &Path, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigInvalid,
            format!("Invalid config {}: {}", path.display(), detail.into()),
        )
    }

    pub fn internal_io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalIoError, message)
    }

    pub fn internal_json(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalJsonError, message)
    }
}
