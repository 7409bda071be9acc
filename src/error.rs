use thiserror::Error;

/// Error type for [Classifier](crate::model::Classifier).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// The requested number of output classes is not a positive integer.
    #[error("invalid configuration: num_classes must be positive, got `{num_classes}`")]
    InvalidConfiguration {
        /// The rejected class count.
        num_classes: usize,
    },

    /// The input tensor's channel or spatial dimensions do not match what
    /// the network was built for.
    #[error("shape mismatch: expected input of shape [batch, {expected:?}], got [batch, {found:?}]")]
    ShapeMismatch {
        /// Expected `[channels, height, width]`.
        expected: [usize; 3],
        /// Actual `[channels, height, width]` of the rejected input.
        found: [usize; 3],
    },
}
