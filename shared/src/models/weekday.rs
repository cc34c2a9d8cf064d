//! Ordering weekdays

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, ErrorCode};

/// Day of the week a dish is offered or delivered on.
///
/// Sunday is not an ordering day. Declaration order is Monday..Saturday and
/// matches the database enum, so `ORDER BY` on the column sorts by day.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "weekday", rename_all = "UPPERCASE"))]
pub enum Weekday {
    #[default]
    Lun,
    Mar,
    Mie,
    Jue,
    Vie,
    Sab,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Lun,
        Weekday::Mar,
        Weekday::Mie,
        Weekday::Jue,
        Weekday::Vie,
        Weekday::Sab,
    ];

    /// Three-letter code used in URLs and storage
    pub const fn code(&self) -> &'static str {
        match self {
            Weekday::Lun => "LUN",
            Weekday::Mar => "MAR",
            Weekday::Mie => "MIE",
            Weekday::Jue => "JUE",
            Weekday::Vie => "VIE",
            Weekday::Sab => "SAB",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Weekday::Lun => "Lunes",
            Weekday::Mar => "Martes",
            Weekday::Mie => "Miércoles",
            Weekday::Jue => "Jueves",
            Weekday::Vie => "Viernes",
            Weekday::Sab => "Sábado",
        }
    }

    /// Zero-based position, Monday = 0
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Weekday {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Weekday::ALL
            .into_iter()
            .find(|d| d.code() == code)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::InvalidWeekday, format!("Invalid weekday: {s}"))
            })
    }
}

/// Weekday option for select lists and tab bars in templates
#[derive(Debug, Clone, Serialize)]
pub struct WeekdayOption {
    pub code: &'static str,
    pub name: &'static str,
}

impl From<Weekday> for WeekdayOption {
    fn from(day: Weekday) -> Self {
        Self {
            code: day.code(),
            name: day.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("LUN".parse::<Weekday>().unwrap(), Weekday::Lun);
        assert_eq!("mie".parse::<Weekday>().unwrap(), Weekday::Mie);
        assert_eq!(" SAB ".parse::<Weekday>().unwrap(), Weekday::Sab);
    }

    #[test]
    fn test_parse_rejects_sunday_and_garbage() {
        let err = "DOM".parse::<Weekday>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWeekday);
        assert!("".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Weekday::Mie.display_name(), "Miércoles");
        assert_eq!(Weekday::Sab.display_name(), "Sábado");
        assert_eq!(Weekday::Lun.to_string(), "LUN");
    }

    #[test]
    fn test_ordering_is_monday_first() {
        let mut days = vec![Weekday::Sab, Weekday::Lun, Weekday::Jue];
        days.sort();
        assert_eq!(days, vec![Weekday::Lun, Weekday::Jue, Weekday::Sab]);
        assert_eq!(Weekday::Vie.index(), 4);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Weekday::Jue).unwrap(), "\"JUE\"");
        let day: Weekday = serde_json::from_str("\"VIE\"").unwrap();
        assert_eq!(day, Weekday::Vie);
    }
}
