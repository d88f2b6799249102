//! Error kinds for the generator, matching the classification in the design's
//! error-handling section: a handful of fatal kinds that abort generation for
//! one file, versus conditions (like an unsupported fast-decode field type)
//! that are not errors at all and are handled inline where they occur.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("field {field} of message {message} has field number {field_number}, outside the 1..536_870_911 range this generator accepts")]
    FieldNumberOutOfRange {
        message: String,
        field: String,
        field_number: i32,
    },

    #[error("message {message} has a field whose type could not be classified: {detail}")]
    DescriptorInconsistency { message: String, detail: String },

    #[error("output sink refused to accept more bytes for {file}")]
    WriterFailure { file: String },
}

pub type Result<T> = std::result::Result<T, GenError>;
