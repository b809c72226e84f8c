use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::warn;

use crate::config::DistractorConfig;
use crate::model::{QuestionKind, QuestionRecord};

/// Number of answer options on every prepared question.
pub const OPTION_COUNT: usize = 4;

const PLACEHOLDER_LEN: usize = 7;
const PLACEHOLDER_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Four distinct answer options, shuffled, containing the correct answer once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    options: Vec<String>,
    padded: usize,
}

impl OptionSet {
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// How many options are placeholders. Non-zero means the pool could not
    /// supply enough real distractors.
    #[must_use]
    pub fn padded(&self) -> usize {
        self.padded
    }

    #[must_use]
    pub fn is_padded(&self) -> bool {
        self.padded > 0
    }

    #[must_use]
    pub fn into_options(self) -> Vec<String> {
        self.options
    }

    #[cfg(test)]
    pub(crate) fn from_parts(options: Vec<String>, padded: usize) -> Self {
        Self { options, padded }
    }
}

/// Accumulates distinct option values.
struct Picked {
    options: Vec<String>,
    seen: HashSet<String>,
}

impl Picked {
    fn new(correct: &str) -> Self {
        Self {
            options: vec![correct.to_owned()],
            seen: HashSet::from([correct.to_owned()]),
        }
    }

    fn is_full(&self) -> bool {
        self.options.len() >= OPTION_COUNT
    }

    fn offer(&mut self, value: &str) {
        if value.trim().is_empty() || self.is_full() {
            return;
        }
        if self.seen.insert(value.to_owned()) {
            self.options.push(value.to_owned());
        }
    }
}

/// Build the answer options for `question` from the rest of `pool`.
///
/// Candidates are drawn at random, with replacement, up to
/// `config.max_attempts()` times per sourcing phase; repeats and the correct
/// answer itself are rejected. Identify-formula questions draw other
/// expressions. Term-meaning questions draw other term meanings first and fall
/// back to formula descriptions (or expressions when a formula has none).
/// Whatever is still missing is padded with random placeholder tokens.
pub fn generate_options<R: Rng + ?Sized>(
    rng: &mut R,
    question: &QuestionRecord,
    pool: &[QuestionRecord],
    config: &DistractorConfig,
) -> OptionSet {
    let mut picked = Picked::new(question.correct_answer());
    let budget = config.max_attempts();

    match question.kind() {
        QuestionKind::IdentifyFormula => {
            let expressions = candidates(pool, QuestionKind::IdentifyFormula, |r| {
                r.correct_answer()
            });
            draw(rng, &expressions, budget, &mut picked);
        }
        QuestionKind::TermMeaning => {
            let meanings = candidates(pool, QuestionKind::TermMeaning, |r| r.correct_answer());
            draw(rng, &meanings, budget, &mut picked);

            if !picked.is_full() {
                let fallback = candidates(pool, QuestionKind::IdentifyFormula, |r| {
                    if r.description().trim().is_empty() {
                        r.correct_answer()
                    } else {
                        r.description()
                    }
                });
                draw(rng, &fallback, budget, &mut picked);
            }
        }
    }

    let padded = OPTION_COUNT.saturating_sub(picked.options.len());
    if padded > 0 {
        warn!(
            question = %question.label(),
            pool = pool.len(),
            padded,
            "pool too small for distinct distractors; padding with placeholders"
        );
        while !picked.is_full() {
            let token = placeholder(rng);
            picked.offer(&token);
        }
    }

    let mut options = picked.options;
    options.shuffle(rng);
    OptionSet { options, padded }
}

fn candidates<'a>(
    pool: &'a [QuestionRecord],
    kind: QuestionKind,
    value: impl Fn(&'a QuestionRecord) -> &'a str,
) -> Vec<&'a str> {
    pool.iter()
        .filter(|record| record.kind() == kind)
        .map(value)
        .collect()
}

fn draw<R: Rng + ?Sized>(rng: &mut R, candidates: &[&str], budget: u32, picked: &mut Picked) {
    for _ in 0..budget {
        if picked.is_full() {
            return;
        }
        let Some(candidate) = candidates.choose(rng) else {
            return;
        };
        picked.offer(candidate);
    }
}

fn placeholder<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..PLACEHOLDER_LEN)
        .map(|_| {
            let idx = rng.random_range(0..PLACEHOLDER_ALPHABET.len());
            char::from(PLACEHOLDER_ALPHABET[idx])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Catalog, Chapter, Formula};
    use crate::pool::build_question_pool;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn kinematics_pool() -> Vec<QuestionRecord> {
        let catalog = Catalog::new(vec![Chapter::new(
            "Kinematics",
            vec![
                Formula::new("Final velocity", "v = u + a t")
                    .with_term("v", "final velocity (m/s)")
                    .with_term("u", "initial velocity (m/s)")
                    .with_description("Relates initial and final velocities."),
                Formula::new("Displacement", "s = u t + (1/2) a t^2")
                    .with_term("s", "displacement (m)")
                    .with_term("a", "acceleration (m/s^2)"),
                Formula::new("Velocity squared", "v^2 = u^2 + 2 a s")
                    .with_term("t", "time elapsed (s)"),
                Formula::new("Newton's Second Law", "F = m a"),
                Formula::new("Momentum", "p = m v"),
            ],
        )]);
        build_question_pool(&catalog)
    }

    fn assert_well_formed(set: &OptionSet, correct: &str) {
        assert_eq!(set.options().len(), OPTION_COUNT);
        let distinct: HashSet<_> = set.options().iter().collect();
        assert_eq!(distinct.len(), OPTION_COUNT);
        assert_eq!(set.options().iter().filter(|o| *o == correct).count(), 1);
    }

    #[test]
    fn every_record_gets_four_distinct_options() {
        let pool = kinematics_pool();
        let mut rng = StdRng::seed_from_u64(7);

        for record in &pool {
            let set = generate_options(&mut rng, record, &pool, &DistractorConfig::default());
            assert_well_formed(&set, record.correct_answer());
            assert!(!set.is_padded());
        }
    }

    #[test]
    fn identify_questions_draw_expressions_only() {
        let pool = kinematics_pool();
        let expressions: HashSet<_> = pool
            .iter()
            .filter(|r| r.kind() == QuestionKind::IdentifyFormula)
            .map(QuestionRecord::correct_answer)
            .collect();
        let mut rng = StdRng::seed_from_u64(11);

        let set = generate_options(&mut rng, &pool[0], &pool, &DistractorConfig::default());
        for option in set.options() {
            assert!(expressions.contains(option.as_str()), "unexpected {option}");
        }
    }

    #[test]
    fn term_questions_prefer_term_meanings() {
        let pool = kinematics_pool();
        let meanings: HashSet<_> = pool
            .iter()
            .filter(|r| r.kind() == QuestionKind::TermMeaning)
            .map(QuestionRecord::correct_answer)
            .collect();
        let question = pool.iter().find(|r| r.term() == Some("v")).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let set = generate_options(&mut rng, question, &pool, &DistractorConfig::default());
        for option in set.options() {
            assert!(meanings.contains(option.as_str()), "unexpected {option}");
        }
    }

    #[test]
    fn term_questions_fall_back_to_descriptions_and_expressions() {
        let catalog = Catalog::new(vec![Chapter::new(
            "Mixed",
            vec![
                Formula::new("Momentum", "p = m v").with_term("p", "momentum"),
                Formula::new("Power", "P = F v").with_description("Rate of doing work."),
                Formula::new("Kinetic Energy", "K = (1/2) m v^2"),
            ],
        )]);
        let pool = build_question_pool(&catalog);
        let question = pool.iter().find(|r| r.term() == Some("p")).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let set = generate_options(&mut rng, question, &pool, &DistractorConfig::default());

        assert_well_formed(&set, "momentum");
        assert!(!set.is_padded());
        let expected: HashSet<&str> =
            HashSet::from(["momentum", "p = m v", "Rate of doing work.", "K = (1/2) m v^2"]);
        let actual: HashSet<&str> = set.options().iter().map(String::as_str).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn tiny_pool_is_padded_with_placeholders() {
        let catalog = Catalog::new(vec![Chapter::new(
            "Tiny",
            vec![
                Formula::new("Momentum", "p = m v"),
                Formula::new("Weight", "W = m g"),
            ],
        )]);
        let pool = build_question_pool(&catalog);
        let mut rng = StdRng::seed_from_u64(1);

        let set = generate_options(&mut rng, &pool[0], &pool, &DistractorConfig::default());

        assert_well_formed(&set, "p = m v");
        assert_eq!(set.padded(), 2);
        assert!(set.options().iter().any(|o| o == "W = m g"));
        let placeholders: Vec<_> = set
            .options()
            .iter()
            .filter(|o| *o != "p = m v" && *o != "W = m g")
            .collect();
        assert_eq!(placeholders.len(), 2);
        for token in placeholders {
            assert_eq!(token.len(), PLACEHOLDER_LEN);
            assert!(token.bytes().all(|b| PLACEHOLDER_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn duplicate_values_in_pool_are_rejected() {
        let catalog = Catalog::new(vec![Chapter::new(
            "Gravitation",
            vec![
                Formula::new("Law", "F = G m1 m2 / r^2")
                    .with_term("G", "grav const")
                    .with_term("r", "distance"),
                Formula::new("Potential", "U = - G m1 m2 / r")
                    .with_term("G", "grav const")
                    .with_term("U", "potential energy"),
            ],
        )]);
        let pool = build_question_pool(&catalog);
        let question = pool.iter().find(|r| r.term() == Some("r")).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let set = generate_options(&mut rng, question, &pool, &DistractorConfig::default());

        assert_well_formed(&set, "distance");
        let grav = set.options().iter().filter(|o| *o == "grav const").count();
        assert_eq!(grav, 1);
    }

    #[test]
    fn single_attempt_budget_still_terminates_with_four_options() {
        let pool = kinematics_pool();
        let config = DistractorConfig::new(1).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let set = generate_options(&mut rng, &pool[0], &pool, &config);
        assert_well_formed(&set, pool[0].correct_answer());
        assert!(set.padded() >= 2);
    }

    #[test]
    fn option_order_is_shuffled() {
        let pool = kinematics_pool();
        let mut rng = StdRng::seed_from_u64(2024);
        let positions: HashSet<_> = (0..40)
            .map(|_| {
                let set =
                    generate_options(&mut rng, &pool[0], &pool, &DistractorConfig::default());
                set.options()
                    .iter()
                    .position(|o| o == pool[0].correct_answer())
                    .unwrap()
            })
            .collect();
        assert_eq!(positions.len(), OPTION_COUNT);
    }
}
