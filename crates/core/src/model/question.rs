use serde::Serialize;

use crate::distractor::OptionSet;

//
// ─── QUESTION RECORD ───────────────────────────────────────────────────────────
//

/// The two kinds of question the pool builder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Given a formula name, pick its expression.
    IdentifyFormula,
    /// Given an expression and one of its symbols, pick the symbol's meaning.
    TermMeaning,
}

/// An atomic, un-optioned question derived from one formula or one formula term.
///
/// Records are only built by [`crate::pool::build_question_pool`], which
/// guarantees the correct answer is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionRecord {
    IdentifyFormula {
        chapter: String,
        formula_name: String,
        expression: String,
        description: String,
    },
    TermMeaning {
        chapter: String,
        formula_name: String,
        term: String,
        meaning: String,
        expression: String,
        description: String,
    },
}

impl QuestionRecord {
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::IdentifyFormula { .. } => QuestionKind::IdentifyFormula,
            Self::TermMeaning { .. } => QuestionKind::TermMeaning,
        }
    }

    #[must_use]
    pub fn chapter(&self) -> &str {
        match self {
            Self::IdentifyFormula { chapter, .. } | Self::TermMeaning { chapter, .. } => chapter,
        }
    }

    #[must_use]
    pub fn formula_name(&self) -> &str {
        match self {
            Self::IdentifyFormula { formula_name, .. } | Self::TermMeaning { formula_name, .. } => {
                formula_name
            }
        }
    }

    /// Expression text of the formula the record was built from.
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::IdentifyFormula { expression, .. } | Self::TermMeaning { expression, .. } => {
                expression
            }
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::IdentifyFormula { description, .. } | Self::TermMeaning { description, .. } => {
                description
            }
        }
    }

    #[must_use]
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::IdentifyFormula { .. } => None,
            Self::TermMeaning { term, .. } => Some(term),
        }
    }

    /// The option text that scores a point.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        match self {
            Self::IdentifyFormula { expression, .. } => expression,
            Self::TermMeaning { meaning, .. } => meaning,
        }
    }

    /// Question text shown to the learner.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self {
            Self::IdentifyFormula { formula_name, .. } => {
                format!("Which of the following is the correct formula for: \"{formula_name}\"?")
            }
            Self::TermMeaning {
                term, expression, ..
            } => format!("In the formula \"{expression}\", what does \"{term}\" represent?"),
        }
    }

    /// Secondary line under the prompt; empty when the formula has no description.
    #[must_use]
    pub fn hint(&self) -> &str {
        self.description()
    }

    /// Short label used in answer history and exports.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::IdentifyFormula { formula_name, .. } => format!("Formula: {formula_name}"),
            Self::TermMeaning {
                term, formula_name, ..
            } => format!("Term: {term} in {formula_name}"),
        }
    }
}

//
// ─── PREPARED QUESTION ─────────────────────────────────────────────────────────
//

/// A question record with its answer options attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuestion {
    record: QuestionRecord,
    options: Vec<String>,
    placeholders: usize,
}

impl PreparedQuestion {
    #[must_use]
    pub fn new(record: QuestionRecord, options: OptionSet) -> Self {
        let placeholders = options.padded();
        Self {
            record,
            options: options.into_options(),
            placeholders,
        }
    }

    #[must_use]
    pub fn record(&self) -> &QuestionRecord {
        &self.record
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        self.record.correct_answer()
    }

    /// Number of options that are synthetic placeholders.
    #[must_use]
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// Exact, case-sensitive comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.record.correct_answer()
    }

    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| self.is_correct(o))
    }
}

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// One answered question. Field names follow the export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    #[serde(rename = "index")]
    pub question_index: usize,
    pub question: String,
    #[serde(rename = "selected")]
    pub selected_option: String,
    #[serde(rename = "correct")]
    pub correct_answer: String,
    #[serde(rename = "correctBool")]
    pub was_correct: bool,
    pub chapter: String,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(question_index: usize, question: &PreparedQuestion, selected: &str) -> Self {
        let record = question.record();
        Self {
            question_index,
            question: record.label(),
            selected_option: selected.to_owned(),
            correct_answer: record.correct_answer().to_owned(),
            was_correct: question.is_correct(selected),
            chapter: record.chapter().to_owned(),
        }
    }
}
