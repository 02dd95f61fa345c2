use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug, PartialEq)]
pub enum CommandError {
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    DuplicateKey {
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

impl CommandError {
    pub fn message(&self) -> &str {
        match self {
            CommandError::Validation { message, .. } => message,
            CommandError::Serialization { message } => message,
            CommandError::DuplicateKey { message } => message,
            CommandError::NotFound { message } => message,
            CommandError::Runtime { message, .. } => message,
        }
    }
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::MissingField { message, fields } => {
                CommandError::Validation { message, reason_code: Some(fields.join(",")) }
            }
            LibraryError::InvalidField { message, field } => {
                CommandError::Validation { message, reason_code: Some(field) }
            }
            LibraryError::MalformedBody { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Conflict { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::CommandError;
    use crate::core::library::LibraryError;

    #[test]
    fn test_should_map_library_errors() {
        assert!(matches!(CommandError::from(LibraryError::missing_field("m", &["title"])),
            CommandError::Validation { reason_code: Some(ref code), .. } if code == "title"));
        assert!(matches!(CommandError::from(LibraryError::invalid_field("m", "year")), CommandError::Validation { .. }));
        assert!(matches!(CommandError::from(LibraryError::malformed_body("m")), CommandError::Serialization { .. }));
        assert!(matches!(CommandError::from(LibraryError::conflict("m")), CommandError::DuplicateKey { .. }));
        assert!(matches!(CommandError::from(LibraryError::not_found("m")), CommandError::NotFound { .. }));
        assert!(matches!(CommandError::from(LibraryError::runtime("m", None)), CommandError::Runtime { .. }));
    }

    #[test]
    fn test_should_keep_message() {
        let err = CommandError::from(LibraryError::conflict("Book titled \"Dune\" already exists."));
        assert_eq!("Book titled \"Dune\" already exists.", err.message());
    }
}
