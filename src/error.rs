#![warn(missing_docs)]
//! Xwave specific error structures
use std::{error::Error, fmt::Display};

/// Xwave application specific Result type
pub type XwResult<T> = std::result::Result<T, XwaveError>;

/// Errors that can be returned by the corrector solver, the GSM synthesizer and their helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XwaveError {
    /// bad caller input, detected before any wavefront is mutated.
    Validation {
        /// name of the offending field
        field: String,
        /// the value that violated the constraint
        value: String,
        /// the violated constraint
        reason: String,
    },
    /// division by zero or NaN arising from degenerate (but formally valid) physical inputs
    NumericDegeneracy(String),
    /// failures reported by a collaborator (material database, wavefront container)
    Collaborator(String),
    /// errors of the command line frontend (file io, argument parsing)
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl XwaveError {
    /// Convenience constructor for a [`XwaveError::Validation`] error.
    pub fn validation(field: &str, value: impl Display, reason: &str) -> Self {
        Self::Validation {
            field: field.to_owned(),
            value: value.to_string(),
            reason: reason.to_owned(),
        }
    }
}

impl Display for XwaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation {
                field,
                value,
                reason,
            } => {
                write!(f, "Validation:{field} = {value}: {reason}")
            }
            Self::NumericDegeneracy(m) => {
                write!(f, "NumericDegeneracy:{m}")
            }
            Self::Collaborator(m) => {
                write!(f, "Collaborator:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "Xwave Error:Other:{m}"),
        }
    }
}
impl Error for XwaveError {}

impl std::convert::From<String> for XwaveError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
