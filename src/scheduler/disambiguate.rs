//! Same-start disambiguation
//!
//! The booking form cannot hold two recordings starting at the same minute in
//! one pass. When a candidate starts exactly when the previous candidate
//! (after its own shift) starts, it is pushed back by one minute. Only
//! adjacent entries are compared.

use chrono::{Duration, NaiveDateTime};

use crate::models::MAX_START_SHIFT_MINUTES;

/// Accumulator carrying the previous effective start through a pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartDisambiguator {
    previous: Option<NaiveDateTime>,
}

impl StartDisambiguator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective start for the next candidate in input order
    ///
    /// `None` when the shifted start falls past the calendar; the state is
    /// left unchanged then.
    pub fn effective_start(&mut self, raw: NaiveDateTime) -> Option<NaiveDateTime> {
        let start = match self.previous {
            Some(previous) if previous == raw => {
                raw.checked_add_signed(Duration::minutes(MAX_START_SHIFT_MINUTES))?
            }
            _ => raw,
        };
        self.previous = Some(start);
        Some(start)
    }

    /// Previous effective start, if any candidate was seen
    pub fn previous(&self) -> Option<NaiveDateTime> {
        self.previous
    }
}

/// Effective starts of a whole sequence of raw starts
pub fn disambiguate_starts(
    raw: impl IntoIterator<Item = NaiveDateTime>,
) -> Option<Vec<NaiveDateTime>> {
    let mut state = StartDisambiguator::new();
    raw.into_iter()
        .map(|start| state.effective_start(start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_guide_time;

    fn at(raw: &str) -> NaiveDateTime {
        parse_guide_time(raw).unwrap()
    }

    #[test]
    fn test_first_start_unchanged() {
        let mut state = StartDisambiguator::new();
        assert!(state.previous().is_none());
        assert_eq!(state.effective_start(at("202401151000")), Some(at("202401151000")));
        assert_eq!(state.previous(), Some(at("202401151000")));
    }

    #[test]
    fn test_adjacent_duplicate_shifted() {
        let starts = disambiguate_starts([at("202401151000"), at("202401151000")]).unwrap();
        assert_eq!(starts, vec![at("202401151000"), at("202401151001")]);
    }

    #[test]
    fn test_comparison_uses_shifted_previous() {
        // Third raw 10:00 is compared with the shifted 10:01, so it stays
        let starts = disambiguate_starts([
            at("202401151000"),
            at("202401151000"),
            at("202401151000"),
        ])
        .unwrap();
        assert_eq!(
            starts,
            vec![at("202401151000"), at("202401151001"), at("202401151000")]
        );
    }

    #[test]
    fn test_non_adjacent_duplicates_untouched() {
        let starts = disambiguate_starts([
            at("202401151000"),
            at("202401151100"),
            at("202401151000"),
        ])
        .unwrap();
        assert_eq!(
            starts,
            vec![at("202401151000"), at("202401151100"), at("202401151000")]
        );
    }

    #[test]
    fn test_shift_collides_with_next_raw() {
        // 10:00, 10:00 -> 10:01; a raw 10:01 after that is shifted to 10:02
        let starts = disambiguate_starts([
            at("202401151000"),
            at("202401151000"),
            at("202401151001"),
        ])
        .unwrap();
        assert_eq!(starts[2], at("202401151002"));
    }

    #[test]
    fn test_shift_past_calendar_end() {
        let last = NaiveDateTime::MAX;
        let mut state = StartDisambiguator::new();
        assert_eq!(state.effective_start(last), Some(last));
        assert_eq!(state.effective_start(last), None);
        assert_eq!(state.previous(), Some(last));
    }
}
