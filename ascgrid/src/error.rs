use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AscGridError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("grid file not found {0}")]
    NotFound(PathBuf),

    #[error("missing header field '{0}'")]
    MissingField(&'static str),

    #[error("line {line}: expected header field '{expected}', found '{found}'")]
    UnexpectedField {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: invalid value '{value}' for '{field}'")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("invalid sample '{value}' on line {line}")]
    InvalidSample { line: usize, value: String },

    #[error("line {line}: expected {expected} samples, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{rows} rows x {cols} cols overflows the sample count")]
    TooLarge { rows: usize, cols: usize },

    #[error("expected {expected} samples ({rows} rows x {cols} cols), found {found}")]
    Dimensions {
        rows: usize,
        cols: usize,
        expected: usize,
        found: usize,
    },
}
