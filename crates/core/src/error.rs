//! Error types for holtek-mouse-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID device communication failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// Device not found during enumeration.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// A transfer moved a different number of bytes than the report length.
    #[error("transfer length mismatch: expected {expected} bytes, got {actual}")]
    TransferLengthMismatch { expected: usize, actual: usize },

    /// Response too short to contain the echoed header and requested payload.
    #[error("short response: {len} bytes")]
    ShortResponse { len: usize },

    /// Opcode arguments do not fit in the chosen report size.
    #[error("arguments too long: {len} bytes do not fit in a {capacity}-byte report")]
    ArgumentsTooLong { len: usize, capacity: usize },

    /// Profile index outside 0..5.
    #[error("invalid profile: {0} (expected 0..=4)")]
    InvalidProfile(u8),

    /// Button name or index not present in the model's button layout.
    #[error("invalid button: {0}")]
    InvalidButton(String),

    /// Value outside an attribute's legal set.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// The relock transfer failed; the device may still be unlocked.
    #[error(
        "device lock state ambiguous: relock failed ({lock_error}){}",
        body_error.as_ref().map(|e| format!(" after: {e}")).unwrap_or_default()
    )]
    LockStateAmbiguous {
        body_error: Option<Box<Error>>,
        lock_error: Box<Error>,
    },

    /// Configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid_value(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}

impl From<hidapi::HidError> for Error {
    fn from(e: hidapi::HidError) -> Self {
        Error::Hid(e.to_string())
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
