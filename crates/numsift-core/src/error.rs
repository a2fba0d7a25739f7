use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid mobile number: {0}")]
    InvalidMobileNumber(String),
    #[error("invalid STD code: {0}")]
    InvalidStdCode(String),
}
