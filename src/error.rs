use std::fmt;
use thiserror::Error;

/// Closed set of failure kinds every backend maps its native errors onto.
///
/// Callers match on these instead of on backend text. Two errors with the
/// same kind compare equal no matter which package, operation or backend
/// message they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PackageNotFound,
    PackageNotInstalled,
    PackageAlreadyInstalled,
    RepositoryExists,
    RepositoryNotFound,
    UpdateFailed,
    InstallFailed,
    RemoveFailed,
    /// Generic failure of a query or repository operation
    OperationFailed,
    LockUnavailable,
    DependencyConflict,
    VerificationFailed,
    Unsupported,
    NetworkUnavailable,
    InsufficientSpace,
}

impl ErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PackageNotFound => "package not found",
            Self::PackageNotInstalled => "package not installed",
            Self::PackageAlreadyInstalled => "package already installed",
            Self::RepositoryExists => "repository already exists",
            Self::RepositoryNotFound => "repository not found",
            Self::UpdateFailed => "update failed",
            Self::InstallFailed => "install failed",
            Self::RemoveFailed => "remove failed",
            Self::OperationFailed => "operation failed",
            Self::LockUnavailable => "could not acquire package manager lock",
            Self::DependencyConflict => "dependency conflict",
            Self::VerificationFailed => "signature verification failed",
            Self::Unsupported => "operation not supported",
            Self::NetworkUnavailable => "network unavailable",
            Self::InsufficientSpace => "insufficient disk space",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Name of the contract operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Install,
    Remove,
    Update,
    Upgrade,
    IsInstalled,
    Search,
    Info,
    ListInstalled,
    ListUpgradable,
    AddRepository,
    RemoveRepository,
    ListRepositories,
    EnableRepository,
    DisableRepository,
    RefreshRepositories,
    Clean,
    AutoRemove,
    Verify,
    Keyring,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Remove => "remove",
            Self::Update => "update",
            Self::Upgrade => "upgrade",
            Self::IsInstalled => "is-installed",
            Self::Search => "search",
            Self::Info => "info",
            Self::ListInstalled => "list-installed",
            Self::ListUpgradable => "list-upgradable",
            Self::AddRepository => "add-repository",
            Self::RemoveRepository => "remove-repository",
            Self::ListRepositories => "list-repositories",
            Self::EnableRepository => "enable-repository",
            Self::DisableRepository => "disable-repository",
            Self::RefreshRepositories => "refresh-repositories",
            Self::Clean => "clean",
            Self::AutoRemove => "autoremove",
            Self::Verify => "verify",
            Self::Keyring => "keyring",
        }
    }

    /// Kind reported when no specific pattern matched the failure text.
    pub fn fallback_kind(&self) -> ErrorKind {
        match self {
            Self::Install | Self::Upgrade => ErrorKind::InstallFailed,
            Self::Remove | Self::AutoRemove => ErrorKind::RemoveFailed,
            Self::Update | Self::RefreshRepositories | Self::Clean => ErrorKind::UpdateFailed,
            _ => ErrorKind::OperationFailed,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw text of a backend failure, kept for diagnostics only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendMessage(pub String);

/// A canonical error: one [`ErrorKind`] decorated with context.
#[derive(Debug, Clone)]
pub struct PackageError {
    kind: ErrorKind,
    operation: Operation,
    target: Option<String>,
    cause: Option<BackendMessage>,
}

impl PackageError {
    pub fn new(kind: ErrorKind, operation: Operation) -> Self {
        Self {
            kind,
            operation,
            target: None,
            cause: None,
        }
    }

    /// Attach the package or repository the failure is about.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Attach the native tool's message. Blank text is ignored.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        let cause = cause.into();
        let trimmed = cause.trim();
        if !trimmed.is_empty() {
            self.cause = Some(BackendMessage(trimmed.to_string()));
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_ref().map(|c| c.0.as_str())
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for PackageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.kind)?;
        if let Some(target) = &self.target {
            write!(f, " '{}'", target)?;
        }
        if let Some(cause) = &self.cause
            && let Some(first) = cause.0.lines().find(|l| !l.trim().is_empty())
        {
            write!(f, " ({})", first.trim())?;
        }
        Ok(())
    }
}

impl std::error::Error for PackageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

impl PartialEq for PackageError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for PackageError {}

impl PartialEq<ErrorKind> for PackageError {
    fn eq(&self, other: &ErrorKind) -> bool {
        self.kind == *other
    }
}

/// The process could not be run to completion.
///
/// A nonzero exit status is not an `ExecutionError`; it arrives as a normal
/// [`crate::execution::CommandResult`].
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to start '{command}': {reason}")]
    Spawn { command: String, reason: String },

    #[error("'{command}' timed out after {seconds} seconds")]
    TimedOut { command: String, seconds: u64 },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("I/O error while running '{command}': {reason}")]
    Io { command: String, reason: String },
}

#[derive(Error, Debug)]
pub enum DistroPkgError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Unsupported distribution: {0}")]
    UnsupportedDistribution(String),

    #[error("Distribution detection failed: {0}")]
    DistroDetection(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("KDL parse error: {0}")]
    KdlError(#[from] kdl::KdlError),

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl DistroPkgError {
    /// Canonical kind, if this is a classified package-manager failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Package(e) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }
}

pub type Result<T> = std::result::Result<T, DistroPkgError>;

#[cfg(test)]
mod tests;
