use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum BuildError {
    #[error(
        "got {aabbs} bounding boxes for {triangles} triangles; \
         both must have the same length"
    )]
    MismatchedInputs { aabbs: usize, triangles: usize },

    #[error("invalid `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: &'static str,
    },

    #[error("got {count} primitives, but at most 2^32 - 1 are supported")]
    TooManyPrimitives { count: usize },
}

pub type BuildResult<T> = Result<T, BuildError>;
