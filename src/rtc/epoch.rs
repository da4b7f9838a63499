//! Conversion between the calendar fields and linear timestamps, relative to either the Unix
//! epoch or 2000-01-01 00:00:00.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use super::{CalendarTime, Rtc};
use crate::regs::Hardware;

/// Seconds from 1970-01-01 to 2000-01-01, the calendar's base.
pub const EPOCH_OFFSET: u32 = 946_684_800;

/// Unix timestamp of the calendar fields. Out-of-range fields are carried into the next
/// larger unit, so month 13 is January of the following year and day 0 the last day of the
/// previous month.
fn timestamp(time: &CalendarTime) -> Option<i64> {
    let months = time.month as i32 - 1;
    let year = 2_000 + time.year as i32 + months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    let offset = TimeDelta::try_days(time.day as i64 - 1)?
        + TimeDelta::try_hours(time.hour as i64)?
        + TimeDelta::try_minutes(time.minute as i64)?
        + TimeDelta::try_seconds(time.second as i64)?;

    Some(first.checked_add_signed(offset)?.and_utc().timestamp())
}

fn naive_to_calendar(dt: &NaiveDateTime) -> CalendarTime {
    CalendarTime {
        year: (dt.year() - 2_000) as u8,
        month: dt.month() as u8,
        day: dt.day() as u8,
        hour: dt.hour() as u8,
        minute: dt.minute() as u8,
        second: dt.second() as u8,
    }
}

/// Calendar fields of a Unix timestamp, clamped to no earlier than 2000-01-01.
fn calendar_from_timestamp(ts: u32) -> CalendarTime {
    let ts = ts.max(EPOCH_OFFSET);
    match DateTime::from_timestamp(ts as i64, 0) {
        Some(dt) => naive_to_calendar(&dt.naive_utc()),
        None => CalendarTime::default(),
    }
}

impl<H: Hardware> Rtc<H> {
    /// Seconds since 1970-01-01, from one synchronized read of the clock. Outside calendar
    /// mode, this is the timestamp of the default date, `EPOCH_OFFSET`.
    pub fn get_epoch(&mut self) -> u32 {
        let time = self.get_date_time();
        timestamp(&time).map_or(0, |ts| ts as u32)
    }

    /// Seconds since 2000-01-01.
    pub fn get_y2k_epoch(&mut self) -> u32 {
        self.get_epoch().wrapping_sub(EPOCH_OFFSET)
    }

    /// Set the clock from seconds since 1970-01-01. Earlier than 2000 clamps to
    /// 2000-01-01 00:00:00. All fields are written at once.
    pub fn set_epoch(&mut self, ts: u32) {
        let time = calendar_from_timestamp(ts);
        self.set_date_time(time);
    }

    /// Set the clock from seconds since 2000-01-01.
    pub fn set_y2k_epoch(&mut self, ts: u32) {
        self.set_epoch(ts.wrapping_add(EPOCH_OFFSET));
    }

    /// Set the alarm from seconds since 1970-01-01, clamped like `set_epoch`. The date fields
    /// are written before the time fields.
    pub fn set_alarm_epoch(&mut self, ts: u32) {
        let time = calendar_from_timestamp(ts);

        self.set_alarm_date(time.day, time.month, time.year);
        self.set_alarm_time(time.hour, time.minute, time.second);
    }

    /// The clock as a `chrono` date and time. `None` outside calendar mode, or if the stored
    /// fields don't form a valid date.
    pub fn get_date_time_chrono(&mut self) -> Option<NaiveDateTime> {
        if !self.calendar_active() {
            return None;
        }
        let time = self.get_date_time();
        NaiveDate::from_ymd_opt(
            2_000 + time.year as i32,
            time.month as u32,
            time.day as u32,
        )?
        .and_hms_opt(time.hour as u32, time.minute as u32, time.second as u32)
    }

    /// Set the clock from a `chrono` date and time. Dates before 2000 clamp to
    /// 2000-01-01 00:00:00; years past 2063 wrap, as the year field is 6 bits wide.
    pub fn set_date_time_chrono(&mut self, dt: &NaiveDateTime) {
        let time = if dt.year() < 2_000 {
            CalendarTime::default()
        } else {
            naive_to_calendar(dt)
        };
        self.set_date_time(time);
    }
}
