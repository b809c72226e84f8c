use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{PreparedQuestion, QuestionKind, QuestionRecord};
use quiz_core::{QuizConfig, generate_options};

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<PreparedQuestion>,
    pub identify_selected: usize,
    pub term_selected: usize,
    /// Questions whose options had to be padded with placeholders.
    pub padded_questions: usize,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Picks a balanced subset of the question pool and prepares options for it.
pub struct SessionBuilder<'a> {
    pool: &'a [QuestionRecord],
    config: &'a QuizConfig,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(pool: &'a [QuestionRecord], config: &'a QuizConfig) -> Self {
        Self { pool, config }
    }

    /// Build a session plan.
    ///
    /// - The count is `config.question_count()` clamped to the pool size.
    /// - Picks alternate between identify-formula and term-meaning records,
    ///   random within each bucket, switching to the other bucket once one
    ///   runs dry.
    /// - Every pick gets its options from the whole pool, then the chosen
    ///   list is shuffled.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> SessionPlan {
        let wanted = usize::try_from(self.config.question_count())
            .unwrap_or(usize::MAX)
            .min(self.pool.len());

        let (mut identify, mut terms): (Vec<&QuestionRecord>, Vec<&QuestionRecord>) = self
            .pool
            .iter()
            .partition(|record| record.kind() == QuestionKind::IdentifyFormula);

        let distractors = self.config.distractors();
        let mut questions = Vec::with_capacity(wanted);
        let mut identify_selected = 0;
        let mut term_selected = 0;
        let mut padded_questions = 0;

        while questions.len() < wanted {
            let prefer_identify = questions.len() % 2 == 0;
            let bucket = if (prefer_identify && !identify.is_empty()) || terms.is_empty() {
                &mut identify
            } else {
                &mut terms
            };
            if bucket.is_empty() {
                break;
            }

            let record = bucket.swap_remove(rng.random_range(0..bucket.len()));
            match record.kind() {
                QuestionKind::IdentifyFormula => identify_selected += 1,
                QuestionKind::TermMeaning => term_selected += 1,
            }

            let options = generate_options(rng, record, self.pool, &distractors);
            if options.is_padded() {
                padded_questions += 1;
            }
            questions.push(PreparedQuestion::new(record.clone(), options));
        }

        questions.shuffle(rng);

        SessionPlan {
            questions,
            identify_selected,
            term_selected,
            padded_questions,
        }
    }
}
