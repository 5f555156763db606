//! Opening hours and appointment slot generation.
//!
//! Slots are wall-clock `HH:MM` values in the shop's local time. Generation is
//! a plain walk from the opening time to the closing time; existing bookings
//! are never consulted, so two customers can hold the same slot.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{BookError, BookResult};

/// Default distance between two generated slots.
pub const DEFAULT_SLOT_STEP_MINUTES: u32 = 30;

const SLOT_FORMAT: &str = "%H:%M";

/// Serde adapter that reads and writes `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_slot(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_slot(&raw).map_err(serde::de::Error::custom)
    }
}

pub fn format_slot(time: NaiveTime) -> String {
    time.format(SLOT_FORMAT).to_string()
}

/// Parses an `HH:MM` string. Seconds are not accepted.
pub fn parse_slot(raw: &str) -> BookResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), SLOT_FORMAT)
        .map_err(|_| BookError::Validation(format!("Invalid time '{}', expected HH:MM", raw)))
}

pub fn parse_date(raw: &str) -> BookResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| BookError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Produces every `open + k * step` strictly before `close`.
pub fn generate_slots(open: NaiveTime, close: NaiveTime, step_minutes: u32) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    if step_minutes == 0 || close <= open {
        return slots;
    }

    let step = Duration::minutes(i64::from(step_minutes));
    let mut current = open;
    while current < close {
        slots.push(current);
        let (next, wrapped) = current.overflowing_add_signed(step);
        // Stop rather than wrap past midnight.
        if wrapped != 0 || next <= current {
            break;
        }
        current = next;
    }
    slots
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
}

/// A shop's weekly hours, either one window shared by a list of days or an
/// explicit window per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OperatingHours {
    Flat {
        #[serde(with = "hhmm")]
        open: NaiveTime,
        #[serde(with = "hhmm")]
        close: NaiveTime,
        days: Vec<DayOfWeek>,
    },
    PerDay {
        days: BTreeMap<DayOfWeek, DayHours>,
    },
}

impl Default for OperatingHours {
    fn default() -> Self {
        OperatingHours::Flat {
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
            days: vec![
                DayOfWeek::Monday,
                DayOfWeek::Tuesday,
                DayOfWeek::Wednesday,
                DayOfWeek::Thursday,
                DayOfWeek::Friday,
            ],
        }
    }
}

impl OperatingHours {
    /// Opening window for `day`, or `None` when the shop is closed that day.
    pub fn hours_for(&self, day: DayOfWeek) -> Option<DayHours> {
        match self {
            OperatingHours::Flat { open, close, days } => days.contains(&day).then_some(DayHours {
                open: *open,
                close: *close,
            }),
            OperatingHours::PerDay { days } => days.get(&day).copied(),
        }
    }

    pub fn validate(&self) -> BookResult<()> {
        let windows: Vec<(Option<DayOfWeek>, DayHours)> = match self {
            OperatingHours::Flat { open, close, .. } => vec![(
                None,
                DayHours {
                    open: *open,
                    close: *close,
                },
            )],
            OperatingHours::PerDay { days } => days.iter().map(|(d, h)| (Some(*d), *h)).collect(),
        };

        for (day, hours) in windows {
            if hours.close <= hours.open {
                let label = day.map(|d| format!(" on {:?}", d)).unwrap_or_default();
                return Err(BookError::Validation(format!(
                    "Closing time must be after opening time{}",
                    label
                )));
            }
        }
        Ok(())
    }

    /// Slots on `date`. When `now` falls on the same local date, slots at or
    /// before it are dropped; dates before `now` yield nothing.
    pub fn slots_on(
        &self,
        date: NaiveDate,
        step_minutes: u32,
        now: Option<NaiveDateTime>,
    ) -> Vec<NaiveTime> {
        let Some(hours) = self.hours_for(date.weekday().into()) else {
            return Vec::new();
        };

        let slots = generate_slots(hours.open, hours.close, step_minutes);
        match now {
            Some(now) if date < now.date() => Vec::new(),
            Some(now) if date == now.date() => {
                slots.into_iter().filter(|slot| *slot > now.time()).collect()
            }
            _ => slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub shop_id: uuid::Uuid,
    pub date: NaiveDate,
    pub closed: bool,
    pub slots: Vec<String>,
}
