use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of a failure that is reported to a caller of the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or its configuration file is missing or invalid.
    Config,
    /// The durable storage medium could not be written (or read, where that is not recovered).
    Storage,
    /// A transaction candidate was rejected because it does not satisfy the record invariants.
    Validation,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error that has been tagged with an `ErrorType` at the public boundary.
struct PubError {
    error_type: ErrorType,
    source: Error,
}

impl Debug for PubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.source)
    }
}

impl Display for PubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.source)
    }
}

impl std::error::Error for PubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

/// Converts any result into a crate `Result` whose error carries an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let source = e.into();
            // Keep the innermost tag if the error has already been classified.
            if source.downcast_ref::<PubError>().is_some() {
                source
            } else {
                Error::new(PubError { error_type, source })
            }
        })
    }
}

/// Returns the `ErrorType` that an error was tagged with, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.chain()
        .find_map(|cause| cause.downcast_ref::<PubError>())
        .map(|pub_error| pub_error.error_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_tags_error() {
        let result: Result<()> = Err(anyhow!("disk full")).pub_result(ErrorType::Storage);
        let e = result.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Storage));
        assert_eq!(e.to_string(), "storage error: disk full");
    }

    #[test]
    fn test_pub_result_keeps_inner_tag() {
        let inner: Result<()> = Err(anyhow!("blank category")).pub_result(ErrorType::Validation);
        let outer = inner.pub_result(ErrorType::Storage).unwrap_err();
        assert_eq!(error_type(&outer), Some(ErrorType::Validation));
    }

    #[test]
    fn test_untagged_error() {
        let e = anyhow!("plain");
        assert_eq!(error_type(&e), None);
    }

    #[test]
    fn test_tag_survives_context() {
        use anyhow::Context;
        let result: Result<()> = Err(anyhow!("bad")).pub_result(ErrorType::Config);
        let e = result.context("while loading").unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Config));
    }
}
