#![forbid(unsafe_code)]

pub mod attempt;
pub mod model;
pub mod partition;
pub mod prepare;
pub mod shuffle;

pub use attempt::{
    AnswerFeedback, Attempt, AttemptAction, AttemptError, AttemptEvent, AttemptKind,
    AttemptPhase, AttemptProgress,
};
pub use partition::{
    MAIN_TESTS_COUNT, QUESTIONS_PER_TEST, RANDOM_POOL_LIMIT, RANDOM_TEST_ID, partition,
};
pub use prepare::{PrepareError, prepare_attempt, prepare_retry};
pub use shuffle::shuffle;
