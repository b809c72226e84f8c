use quiz_core::model::percent;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based index of the question on screen; equals `total` once complete.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub score: usize,
    pub progress_percent: u32,
    pub score_percent: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    pub(crate) fn new(
        position: usize,
        total: usize,
        answered: usize,
        score: usize,
        is_complete: bool,
    ) -> Self {
        Self {
            position,
            total,
            answered,
            remaining: total.saturating_sub(answered),
            score,
            progress_percent: percent(position, total),
            score_percent: percent(score, total),
            is_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_round_against_total() {
        let progress = SessionProgress::new(3, 8, 3, 1, false);
        assert_eq!(progress.progress_percent, 38);
        assert_eq!(progress.score_percent, 13);
        assert_eq!(progress.remaining, 5);
    }

    #[test]
    fn empty_session_does_not_divide_by_zero() {
        let progress = SessionProgress::new(0, 0, 0, 0, false);
        assert_eq!(progress.progress_percent, 0);
        assert_eq!(progress.score_percent, 0);
    }
}
