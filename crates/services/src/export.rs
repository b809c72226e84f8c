//! Download formats for a session's answer history.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use quiz_core::model::AnswerRecord;
use serde::Serialize;

use crate::error::ExportError;
use crate::sessions::QuizSession;

const CSV_HEADER: [&str; 6] = ["index", "question", "selected", "correct", "isCorrect", "chapter"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Json => "quiz-results.json",
            Self::Csv => "quiz-results.csv",
        }
    }
}

/// Answer history plus the score it produced.
#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument<'a> {
    pub results: &'a [AnswerRecord],
    pub score: usize,
    pub total: usize,
}

impl<'a> ExportDocument<'a> {
    #[must_use]
    pub fn new(results: &'a [AnswerRecord], score: usize, total: usize) -> Self {
        Self {
            results,
            score,
            total,
        }
    }

    #[must_use]
    pub fn from_session(session: &'a QuizSession) -> Self {
        Self::new(session.history(), session.score(), session.total())
    }

    /// Render in the requested format.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if serialization fails.
    pub fn render(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => self.to_csv(),
        }
    }

    /// Pretty-printed `{ results, score, total }`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One row per answer under a fixed header, every field quoted.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if a row cannot be written.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER)?;
        for record in self.results {
            writer.write_record([
                record.question_index.to_string().as_str(),
                record.question.as_str(),
                record.selected_option.as_str(),
                record.correct_answer.as_str(),
                if record.was_correct { "true" } else { "false" },
                record.chapter.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Buffer(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| ExportError::Buffer(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<AnswerRecord> {
        vec![
            AnswerRecord {
                question_index: 0,
                question: "Formula: Newton's Second Law".into(),
                selected_option: "F = m a".into(),
                correct_answer: "F = m a".into(),
                was_correct: true,
                chapter: "Laws of Motion".into(),
            },
            AnswerRecord {
                question_index: 1,
                question: "Term: x in SHM displacement".into(),
                selected_option: "say \"amplitude\"".into(),
                correct_answer: "displacement".into(),
                was_correct: false,
                chapter: "Oscillations, Waves".into(),
            },
        ]
    }

    #[test]
    fn json_contains_results_score_and_total() {
        let history = history();
        let json = ExportDocument::new(&history, 1, 12).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["score"], 1);
        assert_eq!(value["total"], 12);
        assert_eq!(value["results"][0]["index"], 0);
        assert_eq!(value["results"][0]["correctBool"], true);
        assert_eq!(value["results"][1]["selected"], "say \"amplitude\"");
        assert!(json.contains('\n'));
    }

    #[test]
    fn csv_quotes_every_field_and_doubles_quotes() {
        let history = history();
        let csv = ExportDocument::new(&history, 1, 2).to_csv().unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(
            lines[0],
            r#""index","question","selected","correct","isCorrect","chapter""#
        );
        assert_eq!(
            lines[1],
            r#""0","Formula: Newton's Second Law","F = m a","F = m a","true","Laws of Motion""#
        );
        assert_eq!(
            lines[2],
            r#""1","Term: x in SHM displacement","say ""amplitude""","displacement","false","Oscillations, Waves""#
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_history_exports_header_only() {
        let csv = ExportDocument::new(&[], 0, 0).to_csv().unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn format_names_match_download_files() {
        assert_eq!(ExportFormat::Json.file_name(), "quiz-results.json");
        assert_eq!(ExportFormat::Csv.file_name(), "quiz-results.csv");
    }
}
