use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    EmptyProcess,
    DisconnectedProcess,
    MissingRoot,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Errors: {0:#?}")]
    InvalidGraph(Vec<ValidationError>),

    #[error("Structural error in {construct}: {message}")]
    Structure {
        construct: &'static str,
        message: String,
    },

    #[error("No grammatical root found in label '{0}'")]
    MissingRoot(String),

    #[error("Unsupported stencils: {}", .0.join(", "))]
    Unsupported(Vec<String>),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model {model_id}: {source}")]
    Model {
        model_id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn structure(construct: &'static str, message: impl Into<String>) -> Self {
        Error::Structure {
            construct,
            message: message.into(),
        }
    }

    pub fn in_model(self, model_id: impl Into<String>) -> Self {
        Error::Model {
            model_id: model_id.into(),
            source: Box::new(self),
        }
    }
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Error::InvalidGraph(errors)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::ParseError(error.to_string())
    }
}
