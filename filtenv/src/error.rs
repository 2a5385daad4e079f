//! Errors raised when wrapping an environment.
use thiserror::Error;

/// Errors raised when wrapping an environment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The action space is not a bounded continuous space.
    #[error("Environment with continuous action space (i.e. Box) required, got {0}")]
    NonContinuousActionSpace(String),

    /// The observation space is not a bounded continuous space.
    #[error("Environment with continuous observation space (i.e. Box) required, got {0}")]
    NonContinuousObservationSpace(String),

    /// The bounds of a `SimBox` action space have different dimensions.
    #[error("SimBox action space of {env_id} has {bounds} dimensions, but its raw bounds have {raw}")]
    ShapeMismatch {
        /// Identifier of the environment.
        env_id: String,
        /// Dimension of the bounds the agent acts in.
        bounds: usize,
        /// Dimension of the raw bounds.
        raw: usize,
    },

    /// Filtered action bounds do not map back to the original bounds.
    #[error("Filtered {bound} action bound maps to {actual:?}, expected {expected:?}")]
    RoundTrip {
        /// `"low"` or `"high"`.
        bound: &'static str,
        /// Original bound.
        expected: Vec<f32>,
        /// Bound obtained by denormalizing the filtered bound.
        actual: Vec<f32>,
    },

    /// An override refers to a dimension the observation space does not have.
    #[error("Override for {env_id} sets observation scale at index {index}, but the observation has {dim} dimensions")]
    OverrideIndex {
        /// Identifier of the environment.
        env_id: String,
        /// Index in the override.
        index: usize,
        /// Dimension of the observation space.
        dim: usize,
    },

    /// An override sets a non-positive or non-finite scale.
    #[error("Override for {env_id} has invalid scale {scale}")]
    OverrideScale {
        /// Identifier of the environment.
        env_id: String,
        /// The scale.
        scale: f32,
    },

    /// The alternate action-space mode needs a branching factor from the wrapped environment.
    #[error("Wolpertinger mode requires a SimBox action space carrying top_n, got {0}")]
    MissingBranchingFactor(String),
}
