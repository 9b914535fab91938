use axum::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure of a single conversion. Never fatal to the process; the HTTP
/// layer turns it into an error envelope.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid target format: {format}")]
    InvalidFormat { format: String },

    #[error("Unsupported conversion from {source_kind} to {target}")]
    UnsupportedFormat { source_kind: String, target: String },

    #[error("Image decode failed: {0}")]
    Decode(String),

    #[error("Encode failed: {0}")]
    Encode(String),

    #[error("PDF generation failed: {0}")]
    PdfGeneration(String),

    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Spreadsheet parse failed: {0}")]
    Parse(String),

    #[error("PDF text extraction failed: {0}")]
    Extraction(String),

    #[error("Scratch file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    pub fn invalid_format(format: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format: format.into(),
        }
    }

    pub fn unsupported(source_kind: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            source_kind: source_kind.into(),
            target: target.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFormat { .. } => StatusCode::BAD_REQUEST,
            Self::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Decode(_) | Self::Parse(_) | Self::Extraction(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::ExternalTool(_) => StatusCode::BAD_GATEWAY,
            Self::Encode(_) | Self::PdfGeneration(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
