//! Literal parsing for the Forthic interpreter
//!
//! This module provides literal parsing functions that convert string tokens into typed values.
//! These handlers are used by the Forthic interpreter to recognize and parse different literal types.
//!
//! Built-in literal types:
//! - Boolean: TRUE, FALSE
//! - Integer: 42, -10, 0
//! - Float: 3.14, -2.5, 0.0
//! - Time: 9:00, 11:30 PM, 22:15
//! - Date: 2020-06-05, YYYY-MM-DD (with wildcards)
//! - ZonedDateTime: ISO 8601 timestamps with timezone support

use crate::errors::ForthicError;
use crate::module::InterpreterContext;
use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// An order-preserving string-keyed mapping, per the record invariant.
pub type ForthicRecord = IndexMap<String, ForthicValue>;

/// A callable handle captured by value (used for key-functions passed to
/// words like `SORT-w/KEY-FUNC`). Two word references are equal only if
/// they share the same name; this is sufficient for the language's needs
/// since word references are never compared for behavioral equivalence.
#[derive(Clone)]
pub struct WordRef {
    pub name: String,
    pub func: Arc<dyn Fn(&mut dyn InterpreterContext) -> Result<(), ForthicError> + Send + Sync>,
}

impl WordRef {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut dyn InterpreterContext) -> Result<(), ForthicError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn call(&self, context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        (self.func)(context)
    }
}

impl fmt::Debug for WordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordRef({})", self.name)
    }
}

impl PartialEq for WordRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// Core value type for Forthic
#[derive(Debug, Clone, PartialEq)]
pub enum ForthicValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<ForthicValue>),
    Record(ForthicRecord),
    Date(NaiveDate),
    /// A time of day, optionally carrying a timezone label attached by `<TZ!`.
    Time(NaiveTime, Option<String>),
    DateTime(chrono::DateTime<Tz>),
    Word(WordRef),
    /// Bundle of named options produced by `~>`, consumed by words that accept them.
    WordOptions(crate::word_options::WordOptions),
    /// Sentinel pushed by `[` to mark the start of an array literal; never
    /// observable outside the tokenizer/interpreter's array-building logic.
    StartArrayMarker,
}

impl ForthicValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, ForthicValue::Null)
    }

    /// Convert to string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ForthicValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to integer if possible
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ForthicValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to float if possible
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ForthicValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert to bool if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ForthicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to array slice if possible
    pub fn as_array(&self) -> Option<&[ForthicValue]> {
        match self {
            ForthicValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Convert to record if possible
    pub fn as_record(&self) -> Option<&ForthicRecord> {
        match self {
            ForthicValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// A key usable for deduplication/equality across heterogeneous values.
    /// Two values produce the same key iff they would compare `==` in Forthic.
    pub fn dedup_key(&self) -> String {
        match self {
            ForthicValue::Null => "null:".to_string(),
            ForthicValue::Bool(b) => format!("bool:{}", b),
            ForthicValue::Int(i) => format!("num:{}", *i as f64),
            ForthicValue::Float(f) => format!("num:{}", f),
            ForthicValue::String(s) => format!("str:{}", s),
            ForthicValue::Date(d) => format!("date:{}", d),
            ForthicValue::Time(t, _) => format!("time:{}", t),
            ForthicValue::DateTime(dt) => format!("datetime:{}", dt.to_rfc3339()),
            ForthicValue::Array(a) => {
                let parts: Vec<String> = a.iter().map(|v| v.dedup_key()).collect();
                format!("arr:[{}]", parts.join(","))
            }
            ForthicValue::Record(r) => {
                let mut parts: Vec<String> = r.iter().map(|(k, v)| format!("{}={}", k, v.dedup_key())).collect();
                parts.sort();
                format!("rec:{{{}}}", parts.join(","))
            }
            ForthicValue::Word(w) => format!("word:{}", w.name),
            ForthicValue::WordOptions(o) => format!("opts:{}", o),
            ForthicValue::StartArrayMarker => "start-array:".to_string(),
        }
    }
}

impl fmt::Display for ForthicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForthicValue::Null => write!(f, "NULL"),
            ForthicValue::Bool(b) => write!(f, "{}", b),
            ForthicValue::Int(i) => write!(f, "{}", i),
            ForthicValue::Float(n) => write!(f, "{}", n),
            ForthicValue::String(s) => write!(f, "\"{}\"", s),
            ForthicValue::Date(d) => write!(f, "{}", d),
            ForthicValue::Time(t, tz) => match tz {
                Some(tz) => write!(f, "{} {}", t, tz),
                None => write!(f, "{}", t),
            },
            ForthicValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            ForthicValue::Array(a) => {
                let parts: Vec<String> = a.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            ForthicValue::Record(r) => {
                let parts: Vec<String> = r.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            ForthicValue::Word(w) => write!(f, "<{}>", w.name),
            ForthicValue::WordOptions(o) => write!(f, "{}", o),
            ForthicValue::StartArrayMarker => write!(f, "["),
        }
    }
}

/// Literal handler function type
///
/// Takes a string and returns a parsed ForthicValue or None if can't parse
pub type LiteralHandler = fn(&str) -> Option<ForthicValue>;

/// Parse boolean literals: TRUE, FALSE
///
/// # Examples
///
/// ```
/// use forthic::literals::to_bool;
///
/// assert!(to_bool("TRUE").is_some());
/// assert!(to_bool("FALSE").is_some());
/// assert!(to_bool("true").is_none());
/// ```
pub fn to_bool(s: &str) -> Option<ForthicValue> {
    match s {
        "TRUE" => Some(ForthicValue::Bool(true)),
        "FALSE" => Some(ForthicValue::Bool(false)),
        _ => None,
    }
}

/// Parse float literals: 3.14, -2.5, 0.0
///
/// Must contain a decimal point to be recognized as a float.
///
/// # Examples
///
/// ```
/// use forthic::literals::to_float;
///
/// assert!(to_float("3.14").is_some());
/// assert!(to_float("-2.5").is_some());
/// assert!(to_float("42").is_none()); // No decimal point
/// ```
pub fn to_float(s: &str) -> Option<ForthicValue> {
    // Must contain a decimal point
    if !s.contains('.') {
        return None;
    }

    s.parse::<f64>().ok().map(ForthicValue::Float)
}

/// Parse integer literals: 42, -10, 0
///
/// Must not contain a decimal point.
///
/// # Examples
///
/// ```
/// use forthic::literals::to_int;
///
/// assert!(to_int("42").is_some());
/// assert!(to_int("-10").is_some());
/// assert!(to_int("3.14").is_none()); // Has decimal point
/// ```
pub fn to_int(s: &str) -> Option<ForthicValue> {
    // Must not contain a decimal point
    if s.contains('.') {
        return None;
    }

    // Parse the integer
    let result = s.parse::<i64>().ok()?;

    // Verify it's actually an integer string (not "42abc")
    if result.to_string() != s {
        return None;
    }

    Some(ForthicValue::Int(result))
}

/// Parse time literals: 9:00, 11:30 PM, 22:15 AM
///
/// Supports both 24-hour format and 12-hour format with AM/PM. The AM/PM
/// suffix is applied as: take the parsed hour modulo 12, then add 12 if PM.
/// This means `22:15 AM` normalizes to `10:15`, matching the reference
/// interpreter's behavior for hours given in 24-hour form with a suffix.
///
/// # Examples
///
/// ```
/// use forthic::literals::to_time;
///
/// assert!(to_time("14:30").is_some());
/// assert!(to_time("2:30 PM").is_some());
/// assert!(to_time("11:30 AM").is_some());
/// ```
pub fn to_time(s: &str) -> Option<ForthicValue> {
    // Regex: HH:MM or H:MM with optional AM/PM
    let re = Regex::new(r"^(\d{1,2}):(\d{2})(?:\s*(AM|PM))?$").ok()?;
    let caps = re.captures(s)?;

    let mut hours = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let minutes = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let meridiem = caps.get(3).map(|m| m.as_str());

    // Adjust for AM/PM
    if let Some(m) = meridiem {
        hours %= 12;
        if m == "PM" {
            hours += 12;
        }
    }

    // Validate hours and minutes
    if hours > 23 || minutes >= 60 {
        return None;
    }

    NaiveTime::from_hms_opt(hours, minutes, 0).map(|t| ForthicValue::Time(t, None))
}

/// Create a date literal parser with timezone support
///
/// Parses dates in format: YYYY-MM-DD
/// Supports wildcards: YYYY, MM, DD which use current values from the timezone
///
/// # Arguments
///
/// * `timezone` - Timezone to use for wildcard resolution
///
/// # Examples
///
/// ```
/// use forthic::literals::to_literal_date;
///
/// let parser = to_literal_date("UTC");
/// assert!(parser("2023-12-25").is_some());
/// assert!(parser("YYYY-12-25").is_some()); // Uses current year
/// ```
pub fn to_literal_date(timezone: &str) -> impl Fn(&str) -> Option<ForthicValue> + '_ {
    move |s: &str| {
        // Regex: YYYY-MM-DD or wildcards
        let re = Regex::new(r"^(\d{4}|YYYY)-(\d{2}|MM)-(\d{2}|DD)$").ok()?;
        let caps = re.captures(s)?;

        // Get current date in the timezone for wildcard substitution
        let tz: Tz = timezone.parse().ok()?;
        let now = Utc::now().with_timezone(&tz);

        // Parse components with wildcard support
        let year = match caps.get(1)?.as_str() {
            "YYYY" => now.year(),
            y => y.parse::<i32>().ok()?,
        };

        let month = match caps.get(2)?.as_str() {
            "MM" => now.month(),
            m => m.parse::<u32>().ok()?,
        };

        let day = match caps.get(3)?.as_str() {
            "DD" => now.day(),
            d => d.parse::<u32>().ok()?,
        };

        NaiveDate::from_ymd_opt(year, month, day).map(ForthicValue::Date)
    }
}

/// Create a zoned datetime literal parser with timezone support
///
/// Parses ISO 8601 datetime strings:
/// - With UTC: 2025-05-24T10:15:00Z
/// - With offset: 2025-05-24T10:15:00-05:00
/// - Without timezone: 2025-05-24T10:15:00 (uses provided timezone)
///
/// # Arguments
///
/// * `timezone` - Default timezone to use if not specified in string
///
/// # Examples
///
/// ```
/// use forthic::literals::to_zoned_datetime;
///
/// let parser = to_zoned_datetime("America/Los_Angeles");
/// assert!(parser("2023-12-25T14:30:00Z").is_some());
/// assert!(parser("2023-12-25T14:30:00-08:00").is_some());
/// ```
pub fn to_zoned_datetime(timezone: &str) -> impl Fn(&str) -> Option<ForthicValue> + '_ {
    move |s: &str| {
        // Must have 'T' separator for datetime
        if !s.contains('T') {
            return None;
        }

        // `naive-datetime[offset-or-Z][[IANA/Zone]]`. A bracketed zone, if
        // present, picks the displayed timezone; otherwise a `Z`/offset
        // suffix resolves to UTC/itself and a bare naive part resolves to
        // the interpreter's configured timezone.
        let re = Regex::new(
            r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})(Z|[+-]\d{2}:\d{2})?(?:\[([A-Za-z_]+(?:/[A-Za-z_]+)+)\])?$",
        )
        .ok()?;
        let caps = re.captures(s)?;

        let naive_part = caps.get(1)?.as_str();
        let offset_part = caps.get(2).map(|m| m.as_str());
        let bracket_tz = caps.get(3).map(|m| m.as_str());

        match offset_part {
            Some("Z") => {
                let instant = chrono::DateTime::parse_from_rfc3339(&format!("{}Z", naive_part)).ok()?;
                let tz: Tz = bracket_tz.unwrap_or("UTC").parse().ok()?;
                Some(ForthicValue::DateTime(instant.with_timezone(&tz)))
            }
            Some(offset) => {
                let instant =
                    chrono::DateTime::parse_from_rfc3339(&format!("{}{}", naive_part, offset)).ok()?;
                let tz: Tz = bracket_tz.unwrap_or(timezone).parse().ok()?;
                Some(ForthicValue::DateTime(instant.with_timezone(&tz)))
            }
            None => {
                let naive = chrono::NaiveDateTime::parse_from_str(naive_part, "%Y-%m-%dT%H:%M:%S").ok()?;
                let tz: Tz = bracket_tz.unwrap_or(timezone).parse().ok()?;
                tz.from_local_datetime(&naive).earliest().map(ForthicValue::DateTime)
            }
        }
    }
}
