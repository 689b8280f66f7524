//! Error types for scraping and generation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unrecognized column '{0}'")]
    UnrecognizedColumn(String),

    #[error("Table has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("Row has {found} cells, expected {expected}")]
    MalformedRow { expected: usize, found: usize },

    #[error("Invalid property name '{0}'")]
    InvalidIdentifier(String),

    #[error("Scalar type '{0}' not found")]
    UnknownScalar(String),

    #[error("Invalid type '{0}'")]
    InvalidType(String),

    #[error("Invalid required marker '{0}'")]
    InvalidRequired(String),

    #[error("Invalid list item '{0}'")]
    InvalidListItem(String),

    #[error("Type '{name}' not found (referenced by '{referenced_by}')")]
    UnresolvedReference { name: String, referenced_by: String },

    #[error("In type '{name}': {source}")]
    InSchema {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid selector '{0}'")]
    Selector(String),

    #[error("HTTP error: {0}")]
    Http(#[from] isahc::Error),

    #[error("Status code {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Syntax checker failed to run: {0}")]
    Checker(String),
}

impl Error {
    pub(crate) fn in_schema(name: &str, source: Error) -> Self {
        Error::InSchema {
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}
