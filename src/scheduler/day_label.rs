//! Date-picker labels of the booking form
//!
//! The recording form offers relative entries for the next three days and
//! `"<dd> <month>"` entries beyond. The booking driver matches list items by
//! substring, so the UI texts are partial on purpose (`Aujourd` for
//! "Aujourd'hui", `jours` for "Dans 2 jours").

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Month abbreviations shown by the French booking UI, January first
pub const MONTH_NAMES_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Juin", "Juil", "Août", "Sept", "Oct", "Nov", "Déc",
];

/// Date selection entry for a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayLabel {
    Today,
    Tomorrow,
    /// Two days ahead
    DaysAhead,
    /// Any other day, picked by calendar date
    Date { day: u32, month: u32 },
}

impl DayLabel {
    /// Resolve the label for a recording starting on `start_date`
    pub fn resolve(start_date: NaiveDate, today: NaiveDate) -> Self {
        match (start_date - today).num_days() {
            0 => Self::Today,
            1 => Self::Tomorrow,
            2 => Self::DaysAhead,
            _ => Self::Date {
                day: start_date.day(),
                month: start_date.month(),
            },
        }
    }

    /// Text the booking driver looks for in the date list
    pub fn ui_text(&self) -> String {
        match self {
            Self::Today => "Aujourd".to_string(),
            Self::Tomorrow => "Demain".to_string(),
            Self::DaysAhead => "jours".to_string(),
            Self::Date { day, month } => format!("{:02} {}", day, month_name_fr(*month)),
        }
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ui_text())
    }
}

/// French UI month abbreviation for a 1-based month number
pub fn month_name_fr(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES_FR.get(idx as usize))
        .copied()
        .unwrap_or("Mois invalide")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_relative_labels() {
        let today = date(2024, 1, 15);
        assert_eq!(DayLabel::resolve(date(2024, 1, 15), today), DayLabel::Today);
        assert_eq!(DayLabel::resolve(date(2024, 1, 16), today), DayLabel::Tomorrow);
        assert_eq!(DayLabel::resolve(date(2024, 1, 17), today), DayLabel::DaysAhead);
    }

    #[test]
    fn test_date_label_beyond_two_days() {
        let today = date(2024, 1, 30);
        let label = DayLabel::resolve(date(2024, 2, 2), today);
        assert_eq!(label, DayLabel::Date { day: 2, month: 2 });
        assert_eq!(label.ui_text(), "02 Fév");
    }

    #[test]
    fn test_past_day_uses_date_label() {
        let label = DayLabel::resolve(date(2024, 8, 14), date(2024, 8, 15));
        assert_eq!(label.ui_text(), "14 Août");
    }

    #[test]
    fn test_ui_texts() {
        assert_eq!(DayLabel::Today.to_string(), "Aujourd");
        assert_eq!(DayLabel::Tomorrow.to_string(), "Demain");
        assert_eq!(DayLabel::DaysAhead.to_string(), "jours");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name_fr(1), "Jan");
        assert_eq!(month_name_fr(12), "Déc");
        assert_eq!(month_name_fr(0), "Mois invalide");
        assert_eq!(month_name_fr(13), "Mois invalide");
    }
}
