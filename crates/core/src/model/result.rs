use serde::Serialize;

use crate::config::VerdictThresholds;

/// Qualitative message band for a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ready,
    GoodEffort,
    KeepPracticing,
}

impl Verdict {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Ready => "Excellent work — you're ready!",
            Self::GoodEffort => "Good effort — revise the weak areas.",
            Self::KeepPracticing => "Keep practicing — try again!",
        }
    }
}

/// Final figures of a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub verdict: Verdict,
}

impl QuizResult {
    #[must_use]
    pub fn new(score: usize, total: usize, thresholds: VerdictThresholds) -> Self {
        let percentage = percent(score, total);
        Self {
            score,
            total,
            percentage,
            verdict: thresholds.verdict_for(percentage),
        }
    }
}

/// `round(part / whole * 100)`, rounding halves up. A zero `whole` counts as 1.
#[must_use]
pub fn percent(part: usize, whole: usize) -> u32 {
    let whole = whole.max(1) as u64;
    let part = part as u64;
    let rounded = (part * 200 + whole) / (whole * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(percent(9, 12), 75);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(12, 12), 100);
    }

    #[test]
    fn verdict_bands_use_thresholds() {
        let thresholds = VerdictThresholds::default();
        assert_eq!(QuizResult::new(10, 12, thresholds).verdict, Verdict::Ready);
        assert_eq!(QuizResult::new(6, 12, thresholds).verdict, Verdict::GoodEffort);
        assert_eq!(
            QuizResult::new(5, 12, thresholds).verdict,
            Verdict::KeepPracticing
        );
    }

    #[test]
    fn result_reports_rounded_percentage() {
        let result = QuizResult::new(9, 12, VerdictThresholds::default());
        assert_eq!(result.percentage, 75);
        assert_eq!(result.verdict, Verdict::GoodEffort);
    }
}
