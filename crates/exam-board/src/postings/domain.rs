use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Grouping key used for records that carry no exam type.
pub const UNCLASSIFIED: &str = "unclassified";

/// A date field as published by the data endpoint.
///
/// The raw text is preserved for echoing back; comparisons only ever see the
/// parsed instant, which is `None` when the text could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamDate {
    raw: String,
    parsed: Option<NaiveDateTime>,
}

impl ExamDate {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_instant(&raw);
        Self { raw, parsed }
    }

    /// Keeps a non-text value verbatim without attempting to read it as a date.
    fn unparsed(raw: String) -> Self {
        Self { raw, parsed: None }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            raw: date.format("%Y-%m-%d").to_string(),
            parsed: date.and_hms_opt(0, 0, 0),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> Option<NaiveDateTime> {
        self.parsed
    }

    /// `2025年6月15日` style rendering; empty when the value is unparseable.
    pub fn display(&self) -> String {
        match self.parsed {
            Some(instant) => format!(
                "{}年{}月{}日",
                instant.year(),
                instant.month(),
                instant.day()
            ),
            None => String::new(),
        }
    }
}

impl fmt::Display for ExamDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for ExamDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ExamDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Self::parse(text),
            Value::Null => Self::unparsed(String::new()),
            other => Self::unparsed(other.to_string()),
        })
    }
}

/// Parses the date shapes the endpoint is known to emit.
///
/// Every instant is host-local wall time, the same frame as the default `now`:
/// offset-bearing timestamps are converted to the local zone and values
/// without an offset are taken as local already. Date-only values resolve to
/// midnight.
pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// One posted position within one exam administration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub municipality: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub exam_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub recruit_number: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub age_requirement: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub application_start: Option<ExamDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub application_end: Option<ExamDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub exam_date: Option<ExamDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub first_test: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub second_test: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub third_test: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub official_url: Option<String>,
    #[serde(rename = "examResults", default, deserialize_with = "lenient_results")]
    pub results: Vec<ExamResult>,
}

impl ExamRecord {
    pub fn new(municipality: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            municipality: municipality.into(),
            exam_type: None,
            position: position.into(),
            recruit_number: None,
            age_requirement: None,
            application_start: None,
            application_end: None,
            exam_date: None,
            first_test: None,
            second_test: None,
            third_test: None,
            official_url: None,
            results: Vec::new(),
        }
    }

    /// Exam type with the explicit sentinel standing in for absent or blank values.
    pub fn group_key(&self) -> &str {
        match self.exam_type.as_deref() {
            Some(value) if !value.is_empty() => value,
            _ => UNCLASSIFIED,
        }
    }

    pub fn application_end_instant(&self) -> Option<NaiveDateTime> {
        self.application_end.as_ref().and_then(ExamDate::instant)
    }

    pub fn exam_instant(&self) -> Option<NaiveDateTime> {
        self.exam_date.as_ref().and_then(ExamDate::instant)
    }

    pub fn validate(&self, index: usize) -> Result<(), RecordError> {
        if self.municipality.trim().is_empty() {
            return Err(RecordError::MissingField {
                index,
                field: "municipality",
            });
        }
        if self.position.trim().is_empty() {
            return Err(RecordError::MissingField {
                index,
                field: "position",
            });
        }
        Ok(())
    }
}

/// Checks identity fields across a fetched batch, reporting the first offender.
pub fn validate_records(records: &[ExamRecord]) -> Result<(), RecordError> {
    records
        .iter()
        .enumerate()
        .try_for_each(|(index, record)| record.validate(index))
}

/// One historical administration's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub applicants: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub successful: u32,
    #[serde(default, deserialize_with = "lenient_ratio")]
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("exam record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
}

/// Application/exam lifecycle state used for detail, card, and summary views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    Upcoming,
    Active,
    ClosedNoExam,
    Finished,
}

impl ExamStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "募集中",
            Self::ClosedNoExam => "募集終了",
            Self::Finished => "試験終了",
            Self::Upcoming => "募集前",
        }
    }

    /// Ordering weight; higher sorts first.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Active => 3,
            Self::Upcoming => 2,
            Self::ClosedNoExam | Self::Finished => 1,
        }
    }
}

/// Countdown bucket keyed off the application deadline alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Expired,
    Urgent,
    Soon,
    Available,
}

impl Urgency {
    /// Badge text; `days_remaining` is only shown for the urgent and soon buckets.
    pub fn badge(self, days_remaining: Option<i64>) -> String {
        match (self, days_remaining) {
            (Self::Expired, _) => "締切済".to_string(),
            (Self::Urgent | Self::Soon, Some(days)) => format!("残り{days}日"),
            (Self::Urgent | Self::Soon, None) | (Self::Available, _) => "募集中".to_string(),
        }
    }
}

// Field adapters for the data endpoint. A malformed optional value degrades to
// absent so one bad field never costs the rest of the batch; identity fields
// fall back to empty and are caught by `validate_records`.

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(scalar_text)
        .unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(scalar_text)
        .filter(|value| !value.trim().is_empty()))
}

fn optional_date<'de, D>(deserializer: D) -> Result<Option<ExamDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(Value::String(text)) => Some(ExamDate::parse(text)),
        Some(other) => Some(ExamDate::unparsed(other.to_string())),
    })
}

/// Result entries that are not objects are dropped; a non-list value reads as empty.
fn lenient_results<'de, D>(deserializer: D) -> Result<Vec<ExamResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

fn count_of(value: Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Non-numeric counts such as `若干名` read as absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(count_of))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_count(deserializer)?.unwrap_or(0))
}

fn lenient_ratio<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let ratio = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(ratio.filter(|value| value.is_finite()).unwrap_or(0.0))
}
