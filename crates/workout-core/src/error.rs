use thiserror::Error;

/// Errors raised when a document violates a model invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A derived count does not match the blocks it is derived from
    #[error("{field} is {actual} but the mixed blocks give {expected}")]
    CountMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Provenance entries are not aligned with the mixed blocks
    #[error("mix has {blocks} blocks but {sources} provenance entries")]
    ProvenanceMismatch { blocks: usize, sources: usize },
}
