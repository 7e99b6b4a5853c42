use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskboard_core::{AppError, AppResult};

/// Lifecycle status shared by projects and tasks.
///
/// Transported as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum WorkStatus {
    /// Not started.
    #[default]
    Open,
    /// Being worked on.
    InProgress,
    /// Work finished.
    Done,
    /// Closed by the author.
    Closed,
}

impl WorkStatus {
    /// Returns the stable integer code.
    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            Self::Open => 1,
            Self::InProgress => 2,
            Self::Done => 3,
            Self::Closed => 4,
        }
    }

    /// Parses a stored or transported integer code.
    pub fn from_code(code: i16) -> AppResult<Self> {
        match code {
            1 => Ok(Self::Open),
            2 => Ok(Self::InProgress),
            3 => Ok(Self::Done),
            4 => Ok(Self::Closed),
            _ => Err(AppError::Validation(format!(
                "unknown status code '{code}', expected 1-4"
            ))),
        }
    }
}

impl TryFrom<i16> for WorkStatus {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl From<WorkStatus> for i16 {
    fn from(value: WorkStatus) -> Self {
        value.code()
    }
}

/// Checks that an end date, if any, does not precede the start date.
pub fn validate_schedule(start_date: NaiveDate, end_date: Option<NaiveDate>) -> AppResult<()> {
    match end_date {
        Some(end_date) if end_date < start_date => Err(AppError::Validation(format!(
            "end_date {end_date} must not be earlier than start_date {start_date}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{WorkStatus, validate_schedule};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap_or_else(|| panic!("invalid test date"))
    }

    #[test]
    fn status_codes_match_transport_values() {
        assert_eq!(WorkStatus::Done.code(), 3);
        assert_eq!(WorkStatus::from_code(2).ok(), Some(WorkStatus::InProgress));
        assert!(WorkStatus::from_code(0).is_err());
        assert!(WorkStatus::from_code(5).is_err());
    }

    #[test]
    fn schedule_allows_same_day_and_open_end() {
        assert!(validate_schedule(date(10), Some(date(10))).is_ok());
        assert!(validate_schedule(date(10), None).is_ok());
    }

    #[test]
    fn schedule_rejects_end_before_start() {
        assert!(validate_schedule(date(10), Some(date(9))).is_err());
    }
}
