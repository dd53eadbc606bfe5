/// Broad classification of a failure, used for exit codes and for deciding
/// how loudly a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input file could not be read or parsed.
    Load,
    /// Writing the order table to the store failed.
    Persist,
    /// A read-only query against the store failed.
    Query,
    /// Required user input is missing or malformed.
    Validation,
    /// The requested key has no rows.
    NoData,
    /// Too few data points for a regression.
    InsufficientData,
    /// Writing an export file failed.
    Export,
    /// Interactive input (prompt, stdin) failed or was canceled.
    Input,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Load | ErrorKind::Validation | ErrorKind::Export | ErrorKind::Input => 2,
            ErrorKind::NoData | ErrorKind::InsufficientData => 3,
            ErrorKind::Persist | ErrorKind::Query => 4,
        }
    }

    /// Informational kinds are expected outcomes, not faults.
    pub fn is_informational(self) -> bool {
        matches!(self, ErrorKind::NoData | ErrorKind::InsufficientData)
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Load, message)
    }

    pub fn persist(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Persist, message)
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Query, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoData, message)
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientData, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn is_informational(&self) -> bool {
        self.kind.is_informational()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
