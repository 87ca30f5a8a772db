//! Error types for tube manipulation, puzzle moves and generation.

/// Structural misuse of a single tube.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TubeError {
    #[error("cannot pour zero units")]
    ZeroCount,

    #[error("cannot pour {requested} units from a tube holding {available}")]
    NotEnoughUnits { requested: usize, available: usize },

    #[error("top {requested} units are not a single color")]
    MixedRun { requested: usize },
}

/// Failure while applying a step to a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("tube index {index} out of range for a puzzle of {len} tubes")]
    TubeOutOfRange { index: usize, len: usize },

    #[error("cannot pour from empty tube {index}")]
    EmptySource { index: usize },

    #[error(transparent)]
    Tube(#[from] TubeError),
}

/// Failure raised by the generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("{colors} colors cannot be placed into {tubes} tubes")]
    TooManyColors { colors: usize, tubes: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{colors} colors exceed the palette of {} colors", crate::color::Color::MAX_COLORS)]
    PaletteExhausted { colors: usize },

    #[error("no colored tube can take the units left in auxiliary tube {tube}")]
    DrainStalled { tube: usize },

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

impl From<TubeError> for GenerateError {
    fn from(e: TubeError) -> Self {
        GenerateError::Puzzle(PuzzleError::Tube(e))
    }
}

impl GenerateError {
    /// Whether the error was caused by the caller's arguments rather than a defect.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            GenerateError::TooManyColors { .. }
                | GenerateError::InvalidArgument(_)
                | GenerateError::PaletteExhausted { .. }
        )
    }
}
