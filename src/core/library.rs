use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    MissingField {
        message: String,
        fields: Vec<String>,
    },
    InvalidField {
        message: String,
        field: String,
    },
    MalformedBody {
        message: String,
    },
    // A different book already occupies the normalized title.
    Conflict {
        message: String,
    },
    NotFound {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn missing_field(message: &str, fields: &[&str]) -> LibraryError {
        LibraryError::MissingField {
            message: message.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn invalid_field(message: &str, field: &str) -> LibraryError {
        LibraryError::InvalidField { message: message.to_string(), field: field.to_string() }
    }

    pub fn malformed_body(message: &str) -> LibraryError {
        LibraryError::MalformedBody { message: message.to_string() }
    }

    pub fn conflict(message: &str) -> LibraryError {
        LibraryError::Conflict { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn message(&self) -> &str {
        match self {
            LibraryError::MissingField { message, .. } => message,
            LibraryError::InvalidField { message, .. } => message,
            LibraryError::MalformedBody { message } => message,
            LibraryError::Conflict { message } => message,
            LibraryError::NotFound { message } => message,
            LibraryError::Runtime { message, .. } => message,
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            return LibraryError::not_found(format!("{}", err).as_str());
        }
        LibraryError::runtime(format!("io error {:?}", err).as_str(), Some(format!("{:?}", err.kind())))
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::malformed_body(format!("Malformed JSON body: {}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::MissingField { message, fields } => {
                write!(f, "{} {:?}", message, fields)
            }
            LibraryError::InvalidField { message, field } => {
                write!(f, "{} ({})", message, field)
            }
            LibraryError::MalformedBody { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Conflict { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for catalog operations.
pub type LibraryResult<T> = Result<T, LibraryError>;
