pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The failure kinds that the record store distinguishes by name. Everything else travels as a
/// plain [`anyhow::Error`] with context attached.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing collection has never been initialized with `ensure_collection`.
    #[error("the collection '{0}' has not been initialized")]
    CollectionNotFound(String),

    /// An expense identical in (Date, Amount, Category, Notes) already exists.
    #[error("an identical record already exists in '{0}'")]
    DuplicateRecord(String),

    /// A submitted value failed the submission-time checks.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
}
