use alc_tree::TreeError;
use alc_types::ValueKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The construction boundary requires a mapping at the root.
    #[error("configuration root must be a mapping, got {kind}")]
    RootNotMapping { kind: ValueKind },

    /// A container operation failed; propagated unchanged.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type SdkResult<T> = Result<T, SdkError>;
