#![forbid(unsafe_code)]

pub mod config;
pub mod distractor;
pub mod error;
pub mod model;
pub mod pool;
pub mod time;

pub use config::{ConfigError, DistractorConfig, QuizConfig, VerdictThresholds};
pub use distractor::{OPTION_COUNT, OptionSet, generate_options};
pub use error::Error;
pub use pool::{PoolStats, build_question_pool};
pub use time::Clock;
