// DateTime module for Forthic
//
// Date and time operations using chrono for timezone-aware datetime manipulation.
//
// ## Categories
// - Current: TODAY, NOW
// - Conversion to: >TIME, >DATE, >DATETIME, AT, DATE-TIME>DATETIME
// - Conversion from: TIME>STR, DATE>STR, DATE>INT
// - Timezone: <TZ!
// - Timestamps: >TIMESTAMP, DATETIME>TIMESTAMP, TIMESTAMP>DATETIME
// - Date math: ADD-DAYS, +DAYS, SUBTRACT-DATES
// - Week: MONDAY, TUESDAY, WEDNESDAY, THURSDAY, FRIDAY, SATURDAY, SUNDAY

use crate::errors::ForthicError;
use crate::literals::ForthicValue;
use crate::module::{InterpreterContext, Module, ModuleWord};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// DateTimeModule provides date and time operations
pub struct DateTimeModule {
    module: Module,
}

impl DateTimeModule {
    /// Create a new DateTimeModule
    pub fn new() -> Self {
        let mut module = Module::new("datetime".to_string());

        // Register all words
        Self::register_current_words(&mut module);
        Self::register_conversion_to_words(&mut module);
        Self::register_conversion_from_words(&mut module);
        Self::register_timezone_words(&mut module);
        Self::register_timestamp_words(&mut module);
        Self::register_date_math_words(&mut module);
        Self::register_week_words(&mut module);

        Self { module }
    }

    /// Get the underlying module
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Get a mutable reference to the underlying module
    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    // ===== Current Date/Time Operations =====

    fn register_current_words(module: &mut Module) {
        // TODAY
        let word = Arc::new(ModuleWord::new("TODAY".to_string(), Self::word_today));
        module.add_exportable_word(word);

        // NOW
        let word = Arc::new(ModuleWord::new("NOW".to_string(), Self::word_now));
        module.add_exportable_word(word);
    }

    fn word_today(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let tz: Tz = context.timezone().parse().unwrap_or(chrono_tz::UTC);
        let today = Utc::now().with_timezone(&tz).naive_local().date();
        context.stack_push(ForthicValue::Date(today));
        Ok(())
    }

    fn word_now(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let tz: Tz = context.timezone().parse().unwrap_or(chrono_tz::UTC);
        let now = Utc::now().with_timezone(&tz);
        context.stack_push(ForthicValue::DateTime(now));
        Ok(())
    }

    // ===== Conversion To Date/Time =====

    fn register_conversion_to_words(module: &mut Module) {
        // >TIME
        let word = Arc::new(ModuleWord::new(">TIME".to_string(), Self::word_to_time));
        module.add_exportable_word(word);

        // >DATE
        let word = Arc::new(ModuleWord::new(">DATE".to_string(), Self::word_to_date));
        module.add_exportable_word(word);

        // >DATETIME
        let word = Arc::new(ModuleWord::new(">DATETIME".to_string(), Self::word_to_datetime));
        module.add_exportable_word(word);

        // AT
        let word = Arc::new(ModuleWord::new("AT".to_string(), Self::word_at));
        module.add_exportable_word(word);

        // DATE-TIME>DATETIME
        let word = Arc::new(ModuleWord::new(
            "DATE-TIME>DATETIME".to_string(),
            Self::word_at,
        ));
        module.add_exportable_word(word);
    }

    fn word_to_time(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::Time(t, tz) => ForthicValue::Time(t, tz),
            ForthicValue::DateTime(dt) => ForthicValue::Time(dt.time(), None),
            ForthicValue::String(s) => Self::parse_time_string(&s).unwrap_or(ForthicValue::Null),
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_to_date(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::Date(d) => ForthicValue::Date(d),
            ForthicValue::DateTime(dt) => ForthicValue::Date(dt.naive_local().date()),
            ForthicValue::String(s) => {
                Self::parse_date_string(&s).unwrap_or(ForthicValue::Null)
            }
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_to_datetime(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::DateTime(dt) => ForthicValue::DateTime(dt),
            ForthicValue::Int(timestamp) => {
                let tz: Tz = context.timezone().parse().unwrap_or(chrono_tz::UTC);
                match DateTime::from_timestamp(timestamp, 0) {
                    Some(dt) => ForthicValue::DateTime(dt.with_timezone(&tz)),
                    None => ForthicValue::Null,
                }
            }
            ForthicValue::String(s) => {
                Self::parse_datetime_string(&s).unwrap_or(ForthicValue::Null)
            }
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    /// Combines a date and a time-of-day into a zoned instant, anchored in
    /// the interpreter's configured timezone (construction is timezone-aware).
    fn word_at(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let time = context.stack_pop()?;
        let date = context.stack_pop()?;

        let result = match (date, time) {
            (ForthicValue::Date(d), ForthicValue::Time(t, _)) => {
                let naive = d.and_time(t);
                let tz: Option<Tz> = context.timezone().parse().ok();
                match tz.and_then(|tz| tz.from_local_datetime(&naive).earliest()) {
                    Some(zdt) => ForthicValue::DateTime(zdt),
                    None => ForthicValue::Null,
                }
            }
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Conversion From Date/Time =====

    fn register_conversion_from_words(module: &mut Module) {
        // TIME>STR
        let word = Arc::new(ModuleWord::new("TIME>STR".to_string(), Self::word_time_to_str));
        module.add_exportable_word(word);

        // DATE>STR
        let word = Arc::new(ModuleWord::new("DATE>STR".to_string(), Self::word_date_to_str));
        module.add_exportable_word(word);

        // DATE>INT
        let word = Arc::new(ModuleWord::new("DATE>INT".to_string(), Self::word_date_to_int));
        module.add_exportable_word(word);
    }

    /// Renders a time in its attached timezone (from `<TZ!`) if present,
    /// converted into the interpreter's configured timezone; otherwise
    /// renders the naive time as-is.
    fn word_time_to_str(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::Time(t, Some(src_tz)) => {
                let target_tz = context.timezone();
                let rendered = if src_tz == target_tz {
                    t
                } else {
                    Self::convert_time_between_tz(t, &src_tz, &target_tz).unwrap_or(t)
                };
                ForthicValue::String(rendered.format("%H:%M").to_string())
            }
            ForthicValue::Time(t, None) => ForthicValue::String(t.format("%H:%M").to_string()),
            _ => ForthicValue::String(String::new()),
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_date_to_str(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::Date(d) => ForthicValue::String(d.format("%Y-%m-%d").to_string()),
            _ => ForthicValue::String(String::new()),
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_date_to_int(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::Date(d) => {
                let year = d.year();
                let month = d.month();
                let day = d.day();
                let int_val = year * 10000 + (month as i32) * 100 + day as i32;
                ForthicValue::Int(int_val as i64)
            }
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Timezone Operations =====

    fn register_timezone_words(module: &mut Module) {
        // <TZ!
        let word = Arc::new(ModuleWord::new("<TZ!".to_string(), Self::word_tz_bang));
        module.add_exportable_word(word);
    }

    /// Attaches a timezone label to a Time value, to be resolved later by TIME>STR.
    fn word_tz_bang(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let tz_name = context.stack_pop()?;
        let time = context.stack_pop()?;

        let result = match (time, tz_name) {
            (ForthicValue::Time(t, _), ForthicValue::String(tz)) => ForthicValue::Time(t, Some(tz)),
            (other, _) => other,
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Timestamp Operations =====

    fn register_timestamp_words(module: &mut Module) {
        // >TIMESTAMP
        let word = Arc::new(ModuleWord::new(">TIMESTAMP".to_string(), Self::word_to_timestamp));
        module.add_exportable_word(word);

        // DATETIME>TIMESTAMP
        let word = Arc::new(ModuleWord::new(
            "DATETIME>TIMESTAMP".to_string(),
            Self::word_to_timestamp,
        ));
        module.add_exportable_word(word);

        // TIMESTAMP>DATETIME
        let word = Arc::new(ModuleWord::new(
            "TIMESTAMP>DATETIME".to_string(),
            Self::word_timestamp_to_datetime,
        ));
        module.add_exportable_word(word);
    }

    fn word_to_timestamp(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;

        let result = match val {
            ForthicValue::DateTime(dt) => ForthicValue::Int(dt.timestamp()),
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    fn word_timestamp_to_datetime(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let val = context.stack_pop()?;
        let tz: Tz = context.timezone().parse().unwrap_or(chrono_tz::UTC);

        let result = match val {
            ForthicValue::Int(timestamp) => match DateTime::from_timestamp(timestamp, 0) {
                Some(dt) => ForthicValue::DateTime(dt.with_timezone(&tz)),
                None => ForthicValue::Null,
            },
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Date Math Operations =====

    fn register_date_math_words(module: &mut Module) {
        // ADD-DAYS
        let word = Arc::new(ModuleWord::new("ADD-DAYS".to_string(), Self::word_add_days));
        module.add_exportable_word(word);

        // +DAYS
        let word = Arc::new(ModuleWord::new("+DAYS".to_string(), Self::word_add_days));
        module.add_exportable_word(word);

        // SUBTRACT-DATES
        let word = Arc::new(ModuleWord::new("SUBTRACT-DATES".to_string(), Self::word_subtract_dates));
        module.add_exportable_word(word);
    }

    fn word_add_days(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let num_days = context.stack_pop()?;
        let date = context.stack_pop()?;

        let result = match (date, num_days) {
            (ForthicValue::Date(d), ForthicValue::Int(days)) => {
                if let Some(new_date) = d.checked_add_signed(Duration::days(days)) {
                    ForthicValue::Date(new_date)
                } else {
                    ForthicValue::Null
                }
            }
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    /// Returns `date1 - date2` in days (negative when date1 precedes date2),
    /// per the reference test (2020-10-21 minus 2020-11-02 is -12).
    fn word_subtract_dates(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let date2 = context.stack_pop()?;
        let date1 = context.stack_pop()?;

        let result = match (date1, date2) {
            (ForthicValue::Date(d1), ForthicValue::Date(d2)) => {
                let duration = d1.signed_duration_since(d2);
                ForthicValue::Int(duration.num_days())
            }
            _ => ForthicValue::Null,
        };

        context.stack_push(result);
        Ok(())
    }

    // ===== Week Operations =====

    fn register_week_words(module: &mut Module) {
        for (name, offset) in [
            ("MONDAY", 0i64),
            ("TUESDAY", 1),
            ("WEDNESDAY", 2),
            ("THURSDAY", 3),
            ("FRIDAY", 4),
            ("SATURDAY", 5),
            ("SUNDAY", 6),
        ] {
            let word = Arc::new(ModuleWord::new(
                name.to_string(),
                Self::weekday_executor(offset),
            ));
            module.add_exportable_word(word);
        }
    }

    /// Builds a fn pointer-compatible executor for a fixed offset from Monday
    /// of the ISO week (Monday-start) containing today.
    fn weekday_executor(offset: i64) -> fn(&mut dyn InterpreterContext) -> Result<(), ForthicError> {
        match offset {
            0 => Self::word_monday,
            1 => Self::word_tuesday,
            2 => Self::word_wednesday,
            3 => Self::word_thursday,
            4 => Self::word_friday,
            5 => Self::word_saturday,
            _ => Self::word_sunday,
        }
    }

    fn monday_of_this_week(context: &dyn InterpreterContext) -> NaiveDate {
        let tz: Tz = context.timezone().parse().unwrap_or(chrono_tz::UTC);
        let today = Utc::now().with_timezone(&tz).naive_local().date();
        today - Duration::days(today.weekday().num_days_from_monday() as i64)
    }

    fn word_monday(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let monday = Self::monday_of_this_week(context);
        context.stack_push(ForthicValue::Date(monday));
        Ok(())
    }

    fn word_tuesday(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let monday = Self::monday_of_this_week(context);
        context.stack_push(ForthicValue::Date(monday + Duration::days(1)));
        Ok(())
    }

    fn word_wednesday(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let monday = Self::monday_of_this_week(context);
        context.stack_push(ForthicValue::Date(monday + Duration::days(2)));
        Ok(())
    }

    fn word_thursday(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let monday = Self::monday_of_this_week(context);
        context.stack_push(ForthicValue::Date(monday + Duration::days(3)));
        Ok(())
    }

    fn word_friday(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let monday = Self::monday_of_this_week(context);
        context.stack_push(ForthicValue::Date(monday + Duration::days(4)));
        Ok(())
    }

    fn word_saturday(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let monday = Self::monday_of_this_week(context);
        context.stack_push(ForthicValue::Date(monday + Duration::days(5)));
        Ok(())
    }

    fn word_sunday(context: &mut dyn InterpreterContext) -> Result<(), ForthicError> {
        let monday = Self::monday_of_this_week(context);
        context.stack_push(ForthicValue::Date(monday + Duration::days(6)));
        Ok(())
    }

    // ===== Helper Functions =====

    /// Parse time string (HH:MM, HH:MM:SS, or with AM/PM)
    fn parse_time_string(s: &str) -> Option<ForthicValue> {
        let s = s.trim();

        if let Some(captures) = regex::Regex::new(r"^(\d{1,2}):(\d{2})\s*(AM|PM)$")
            .ok()?
            .captures(s)
        {
            let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
            let minute: u32 = captures.get(2)?.as_str().parse().ok()?;
            let meridiem = captures.get(3)?.as_str();

            let hour = if meridiem == "PM" && hour < 12 {
                hour + 12
            } else if meridiem == "AM" && hour == 12 {
                0
            } else {
                hour
            };

            return NaiveTime::from_hms_opt(hour, minute, 0).map(|t| ForthicValue::Time(t, None));
        }

        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
            .map(|t| ForthicValue::Time(t, None))
    }

    /// Parse a human-readable date string ("Oct 21, 2020", "2020-10-21", etc.)
    fn parse_date_string(s: &str) -> Option<ForthicValue> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(ForthicValue::Date(date));
        }

        NaiveDate::parse_from_str(s, "%b %d, %Y")
            .or_else(|_| NaiveDate::parse_from_str(s, "%B %d, %Y"))
            .ok()
            .map(ForthicValue::Date)
    }

    /// Parse datetime string
    fn parse_datetime_string(s: &str) -> Option<ForthicValue> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(ForthicValue::DateTime(dt.with_timezone(&chrono_tz::UTC)));
        }

        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            if let Some(dt) = Utc.from_local_datetime(&naive).single() {
                return Some(ForthicValue::DateTime(dt.with_timezone(&chrono_tz::UTC)));
            }
        }

        None
    }

    /// Reinterprets a naive time-of-day as belonging to `from_tz`, anchored to
    /// today's date, and converts it into `to_tz`.
    fn convert_time_between_tz(t: NaiveTime, from_tz: &str, to_tz: &str) -> Option<NaiveTime> {
        let from: Tz = from_tz.parse().ok()?;
        let to: Tz = to_tz.parse().ok()?;
        let today = Utc::now().naive_utc().date();
        let naive_dt = today.and_time(t);
        let zoned = from.from_local_datetime(&naive_dt).earliest()?;
        Some(zoned.with_timezone(&to).time())
    }
}

impl Default for DateTimeModule {
    fn default() -> Self {
        Self::new()
    }
}
