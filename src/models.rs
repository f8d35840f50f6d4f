// String conversions are part of the item model's public surface for JSON
// collaborators; the CLI does not call every one yet
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Progress state of a practice problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    NotStarted,
    Attempted,
    Solved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "not_started",
            Status::Attempted => "attempted",
            Status::Solved => "solved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_started" | "not started" | "new" | "n" => Some(Status::NotStarted),
            "attempted" | "attempt" | "a" => Some(Status::Attempted),
            "solved" | "solve" | "done" | "s" => Some(Status::Solved),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::Attempted => "Attempted",
            Status::Solved => "Solved",
        }
    }
}

// Self-rated recall strength; drives the spaced review interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    None,
    Weak,
    Medium,
    Strong,
}

impl Confidence {
    /// Days that must elapse after a review before the item is due again.
    pub fn review_interval_days(&self) -> i64 {
        match self {
            Confidence::Weak => 1,
            Confidence::Medium => 3,
            Confidence::Strong => 7,
            Confidence::None => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::None => "none",
            Confidence::Weak => "weak",
            Confidence::Medium => "medium",
            Confidence::Strong => "strong",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Confidence::None),
            "weak" | "hard" | "w" => Some(Confidence::Weak),
            "medium" | "med" | "m" => Some(Confidence::Medium),
            "strong" | "easy" | "s" => Some(Confidence::Strong),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Confidence::None => "None",
            Confidence::Weak => "Weak",
            Confidence::Medium => "Medium",
            Confidence::Strong => "Strong",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "medium" | "med" | "m" => Some(Difficulty::Medium),
            "hard" | "h" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthIdError {
    #[error("invalid month id '{0}', expected YYYY-MM")]
    Malformed(String),
    #[error("month {0} out of range, expected 1-12")]
    MonthOutOfRange(u32),
}

/// Identifier of one monthly study cycle, e.g. "2024-02".
///
/// Parsing is the only way to construct one, so a `MonthId` always holds a
/// real calendar month and downstream date arithmetic cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthId {
    year: i32,
    month: u32,
}

impl MonthId {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthIdError> {
        if !(1..=12).contains(&month) {
            return Err(MonthIdError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Calendar days in this month, leap-year aware.
    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        next.first_day()
            .signed_duration_since(self.first_day())
            .num_days() as u32
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("month id is validated at construction")
    }

    pub fn last_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.days_in_month())
            .expect("month id is validated at construction")
    }

    /// The following cycle, used when starting a new month module.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Human-readable name, e.g. "February 2024".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl FromStr for MonthId {
    type Err = MonthIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MonthIdError::Malformed(s.to_string());
        let (year_str, month_str) = s.split_once('-').ok_or_else(malformed)?;
        if year_str.len() != 4 || month_str.len() != 2 {
            return Err(malformed());
        }
        let year: i32 = year_str.parse().map_err(|_| malformed())?;
        let month: u32 = month_str.parse().map_err(|_| malformed())?;
        MonthId::new(year, month)
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for MonthId {
    type Error = MonthIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MonthId> for String {
    fn from(id: MonthId) -> String {
        id.to_string()
    }
}

// One practice problem tracked across a monthly cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyItem {
    pub id: String,
    pub name: String,
    pub pattern: String,
    pub difficulty: Difficulty,
    pub status: Status,
    pub confidence: Confidence,
    /// Set whenever the item is solved or a review is submitted. An item
    /// can only become due once this is present.
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub attempts: u32,
    pub revision_count: u32,
    pub scheduled_date: Option<NaiveDate>,
    pub month_id: MonthId,
}

impl StudyItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, month_id: MonthId) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pattern: String::from("General"),
            difficulty: Difficulty::Easy,
            status: Status::NotStarted,
            confidence: Confidence::None,
            last_reviewed_at: None,
            attempts: 0,
            revision_count: 0,
            scheduled_date: None,
            month_id,
        }
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod status_tests {
        use super::*;

        #[test]
        fn as_str_round_trips() {
            for status in [Status::NotStarted, Status::Attempted, Status::Solved] {
                assert_eq!(Status::from_str(status.as_str()), Some(status));
            }
        }

        #[test]
        fn from_str_accepts_aliases() {
            assert_eq!(Status::from_str("Not Started"), Some(Status::NotStarted));
            assert_eq!(Status::from_str("DONE"), Some(Status::Solved));
            assert_eq!(Status::from_str("a"), Some(Status::Attempted));
        }

        #[test]
        fn from_str_invalid_returns_none() {
            assert_eq!(Status::from_str("bogus"), None);
            assert_eq!(Status::from_str(""), None);
        }

        #[test]
        fn label_is_human_readable() {
            assert_eq!(Status::NotStarted.label(), "Not Started");
            assert_eq!(Status::Solved.label(), "Solved");
        }
    }

    mod confidence_tests {
        use super::*;

        #[test]
        fn interval_map() {
            assert_eq!(Confidence::Weak.review_interval_days(), 1);
            assert_eq!(Confidence::Medium.review_interval_days(), 3);
            assert_eq!(Confidence::Strong.review_interval_days(), 7);
        }

        #[test]
        fn unset_confidence_defaults_to_shortest_interval() {
            assert_eq!(Confidence::None.review_interval_days(), 1);
        }

        #[test]
        fn from_str_accepts_rating_aliases() {
            // Review ratings also accept the Hard/Medium/Easy vocabulary
            assert_eq!(Confidence::from_str("hard"), Some(Confidence::Weak));
            assert_eq!(Confidence::from_str("easy"), Some(Confidence::Strong));
            assert_eq!(Confidence::from_str("MED"), Some(Confidence::Medium));
        }

        #[test]
        fn from_str_invalid_returns_none() {
            assert_eq!(Confidence::from_str("solid"), None);
        }
    }

    mod difficulty_tests {
        use super::*;

        #[test]
        fn as_str_round_trips() {
            for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
            }
        }
    }

    mod month_id_tests {
        use super::*;

        #[test]
        fn parses_valid_id() {
            let id: MonthId = "2024-02".parse().unwrap();
            assert_eq!(id.year(), 2024);
            assert_eq!(id.month(), 2);
        }

        #[test]
        fn rejects_malformed_ids() {
            assert!("2024".parse::<MonthId>().is_err());
            assert!("2024-2".parse::<MonthId>().is_err());
            assert!("24-02".parse::<MonthId>().is_err());
            assert!("2024-xx".parse::<MonthId>().is_err());
            assert!("".parse::<MonthId>().is_err());
        }

        #[test]
        fn rejects_out_of_range_month() {
            assert_eq!(
                "2024-13".parse::<MonthId>(),
                Err(MonthIdError::MonthOutOfRange(13))
            );
            assert!("2024-00".parse::<MonthId>().is_err());
        }

        #[test]
        fn days_in_month_handles_leap_years() {
            let feb_leap: MonthId = "2024-02".parse().unwrap();
            let feb: MonthId = "2023-02".parse().unwrap();
            let jan: MonthId = "2024-01".parse().unwrap();
            let apr: MonthId = "2024-04".parse().unwrap();
            assert_eq!(feb_leap.days_in_month(), 29);
            assert_eq!(feb.days_in_month(), 28);
            assert_eq!(jan.days_in_month(), 31);
            assert_eq!(apr.days_in_month(), 30);
        }

        #[test]
        fn century_leap_rules() {
            assert_eq!("2000-02".parse::<MonthId>().unwrap().days_in_month(), 29);
            assert_eq!("1900-02".parse::<MonthId>().unwrap().days_in_month(), 28);
        }

        #[test]
        fn first_and_last_day() {
            let id: MonthId = "2024-02".parse().unwrap();
            assert_eq!(id.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
            assert_eq!(id.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        }

        #[test]
        fn next_rolls_over_december() {
            let dec: MonthId = "2023-12".parse().unwrap();
            assert_eq!(dec.next().to_string(), "2024-01");
            let jan: MonthId = "2024-01".parse().unwrap();
            assert_eq!(jan.next().to_string(), "2024-02");
        }

        #[test]
        fn display_pads_month() {
            let id = MonthId::new(2024, 3).unwrap();
            assert_eq!(id.to_string(), "2024-03");
        }

        #[test]
        fn label_names_the_month() {
            let id: MonthId = "2024-02".parse().unwrap();
            assert_eq!(id.label(), "February 2024");
        }

        #[test]
        fn serde_round_trips_as_string() {
            let id: MonthId = "2024-02".parse().unwrap();
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, "\"2024-02\"");
            let back: MonthId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
        }

        #[test]
        fn serde_rejects_malformed_string() {
            assert!(serde_json::from_str::<MonthId>("\"2024\"").is_err());
        }
    }

    mod study_item_tests {
        use super::*;

        #[test]
        fn new_item_starts_blank() {
            let month: MonthId = "2024-01".parse().unwrap();
            let item = StudyItem::new("p1", "Two Sum", month);
            assert_eq!(item.status, Status::NotStarted);
            assert_eq!(item.confidence, Confidence::None);
            assert!(item.last_reviewed_at.is_none());
            assert_eq!(item.attempts, 0);
            assert_eq!(item.revision_count, 0);
        }

        #[test]
        fn serde_round_trips() {
            let month: MonthId = "2024-01".parse().unwrap();
            let mut item = StudyItem::new("p1", "Two Sum", month);
            item.status = Status::Solved;
            item.confidence = Confidence::Medium;
            item.last_reviewed_at = Some(Utc::now());
            let json = serde_json::to_string(&item).unwrap();
            let back: StudyItem = serde_json::from_str(&json).unwrap();
            assert_eq!(back, item);
        }
    }

    mod json_output_tests {
        use super::*;

        #[test]
        fn ok_wraps_data() {
            let output = JsonOutput::ok(42);
            assert!(output.success);
            assert_eq!(output.data, Some(42));
            assert!(output.error.is_none());
        }

        #[test]
        fn err_wraps_message() {
            let output = JsonOutput::<()>::err("bad input");
            assert!(!output.success);
            assert!(output.data.is_none());
            assert_eq!(output.error, Some("bad input".to_string()));
        }

        #[test]
        fn serializes_expected_shape() {
            let json = serde_json::to_string(&JsonOutput::ok("x")).unwrap();
            assert!(json.contains("\"success\":true"));
            assert!(json.contains("\"data\":\"x\""));
        }
    }
}
