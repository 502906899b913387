use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("index {index:?} is outside field {field}'s logical range {logical}")]
    OutOfLogicalRange {
        field: String,
        index: Vec<i64>,
        logical: String,
    },
    #[error("field {field}: split map covers {covered} cells but local range has {expected}")]
    SplitMapMismatch {
        field: String,
        covered: i64,
        expected: i64,
    },
}
