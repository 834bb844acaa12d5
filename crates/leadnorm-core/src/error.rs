use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("lead id is required")]
    EmptyLeadId,
    #[error("no fields to normalize")]
    NoFieldsToNormalize,
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("normalization is enabled but no fields are configured")]
    EmptyFieldSet,
    #[error("invalid batch size: {0}")]
    InvalidBatchSize(i64),
    #[error("invalid max records per run: {0}")]
    InvalidMaxRecords(i64),
    #[error("invalid normalization ttl days: {0}")]
    InvalidTtlDays(i64),
    #[error("invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("invalid trigger event: {0}")]
    InvalidTrigger(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("error parsing response: {0}")]
    InvalidJson(String),
    #[error("error parsing response: response must be a JSON object")]
    NotAnObject,
}
