use thiserror::Error;

/// Failure reported by a [`MarkupBackend`](crate::MarkupBackend).
///
/// Flattening does not recover from backend failures; they are returned to
/// the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// The backend could not compile a tag selector.
    #[error("markup backend rejected selector `{0}`")]
    InvalidSelector(String),
    /// The backend failed to parse or rewrite the fragment.
    #[error("markup backend failed: {0}")]
    Backend(String),
}
