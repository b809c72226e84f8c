use tracing::debug;

use crate::model::{Catalog, QuestionKind, QuestionRecord};

/// Expand a catalog into atomic question records.
///
/// Emits one `IdentifyFormula` record per formula and one `TermMeaning` record
/// per term, in chapter → formula → term order. Formulas without a name or an
/// expression are skipped, as are terms with a blank meaning.
#[must_use]
pub fn build_question_pool(catalog: &Catalog) -> Vec<QuestionRecord> {
    let mut pool = Vec::new();
    let mut skipped = 0_usize;

    for chapter in catalog.chapters() {
        for formula in chapter.formulas() {
            let (Some(name), Some(expression)) = (formula.name(), formula.expression()) else {
                skipped += 1;
                continue;
            };

            pool.push(QuestionRecord::IdentifyFormula {
                chapter: chapter.title().to_owned(),
                formula_name: name.to_owned(),
                expression: expression.to_owned(),
                description: formula.description().to_owned(),
            });

            for (term, meaning) in formula.terms().iter() {
                if meaning.trim().is_empty() {
                    continue;
                }
                pool.push(QuestionRecord::TermMeaning {
                    chapter: chapter.title().to_owned(),
                    formula_name: name.to_owned(),
                    term: term.to_owned(),
                    meaning: meaning.to_owned(),
                    expression: expression.to_owned(),
                    description: formula.description().to_owned(),
                });
            }
        }
    }

    debug!(records = pool.len(), skipped, "built question pool");
    pool
}

/// Record counts per question kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub identify_formula: usize,
    pub term_meaning: usize,
}

impl PoolStats {
    #[must_use]
    pub fn of(pool: &[QuestionRecord]) -> Self {
        pool.iter().fold(Self::default(), |mut stats, record| {
            match record.kind() {
                QuestionKind::IdentifyFormula => stats.identify_formula += 1,
                QuestionKind::TermMeaning => stats.term_meaning += 1,
            }
            stats
        })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.identify_formula + self.term_meaning
    }
}
