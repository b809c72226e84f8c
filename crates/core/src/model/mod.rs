mod catalog;
mod class_level;
mod preferences;
mod question;
mod result;

pub use catalog::{Catalog, Chapter, Formula, Terms};
pub use class_level::{ClassLevel, MAX_CLASS, MIN_CLASS, ParseClassLevelError};
pub use preferences::{PreferencesError, QuizPreferences, QuizPreferencesDraft};
pub use question::{AnswerRecord, PreparedQuestion, QuestionKind, QuestionRecord};
pub use result::{QuizResult, Verdict, percent};
