use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::parser::span::Location;

/// Main error type for brief operations
#[derive(Error, Diagnostic, Debug)]
pub enum BriefError {
    #[error("IO error: {0}")]
    #[diagnostic(code(brief::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(brief::io))]
    Io { path: PathBuf, message: String },

    /// Malformed token: bad block delimiter, unterminated string or block.
    #[error("Scan error: {message} at {location}")]
    #[diagnostic(code(brief::scan))]
    Scan { message: String, location: Location },

    /// Token not legal in the current decoder state.
    #[error("Syntax error: {message} on {token:?} at {location} (state {state})")]
    #[diagnostic(code(brief::syntax))]
    Syntax {
        message: String,
        state: String,
        token: String,
        location: Location,
        #[help]
        help: Option<String>,
    },

    /// Unknown feature or unreadable include target.
    #[error("Reference error: {message}")]
    #[diagnostic(code(brief::reference))]
    Reference {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Name, key or content assigned with no open element.
    #[error("Structural error: {message} at {location}")]
    #[diagnostic(code(brief::structure))]
    Structural { message: String, location: Location },

    #[error("Error in included file {path}")]
    #[diagnostic(code(brief::include))]
    Include {
        path: PathBuf,
        #[source]
        source: Box<BriefError>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(brief::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Store error: {message}")]
    #[diagnostic(code(brief::store))]
    Store {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl BriefError {
    /// Location of the failure, when the error came from scanning or decoding.
    ///
    /// Errors wrapped by an include report the location inside the included file.
    pub fn location(&self) -> Option<Location> {
        match self {
            BriefError::Scan { location, .. }
            | BriefError::Syntax { location, .. }
            | BriefError::Structural { location, .. } => Some(*location),
            BriefError::Include { source, .. } => source.location(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BriefError>;
