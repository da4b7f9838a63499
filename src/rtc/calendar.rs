//! Calendar mode: date and time fields packed into the CLOCK register, and the matching
//! ALARM0 register with its match granularity.
//!
//! Fields are passed through as-is; the hardware doesn't validate ranges and neither do we.
//! Values wider than a field are truncated to its width.

use paste::paste;

use super::{Rtc, RtcMode};
use crate::regs::{Field, Hardware, Reg, rtc};

/// A calendar date and time, as stored by the RTC. `year` counts from 2000.
///
/// The default is 2000-01-01 00:00:00.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self {
            year: 0,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl CalendarTime {
    /// Unpack a CLOCK or ALARM0 register value.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            year: rtc::CLOCK_YEAR.get(bits) as u8,
            month: rtc::CLOCK_MONTH.get(bits) as u8,
            day: rtc::CLOCK_DAY.get(bits) as u8,
            hour: rtc::CLOCK_HOUR.get(bits) as u8,
            minute: rtc::CLOCK_MINUTE.get(bits) as u8,
            second: rtc::CLOCK_SECOND.get(bits) as u8,
        }
    }

    /// Pack into the CLOCK/ALARM0 layout, truncating each field.
    pub fn to_bits(&self) -> u32 {
        let mut bits = rtc::CLOCK_YEAR.set(0, self.year as u32);
        bits = rtc::CLOCK_MONTH.set(bits, self.month as u32);
        bits = rtc::CLOCK_DAY.set(bits, self.day as u32);
        bits = rtc::CLOCK_HOUR.set(bits, self.hour as u32);
        bits = rtc::CLOCK_MINUTE.set(bits, self.minute as u32);
        rtc::CLOCK_SECOND.set(bits, self.second as u32)
    }
}

/// Which alarm fields must equal the clock for the alarm to fire. MASK0 register, SEL field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AlarmMatch {
    /// Never match. The stored alarm fields are kept.
    Off = 0,
    /// Every minute.
    Seconds = 1,
    /// Every hour.
    MinutesSeconds = 2,
    /// Every day.
    HoursMinutesSeconds = 3,
    /// Every month.
    DayHoursMinutesSeconds = 4,
    /// Every year.
    MonthDayHoursMinutesSeconds = 5,
    /// Once.
    YearMonthDayHoursMinutesSeconds = 6,
}

impl AlarmMatch {
    fn from_bits(bits: u32) -> Self {
        match bits {
            1 => Self::Seconds,
            2 => Self::MinutesSeconds,
            3 => Self::HoursMinutesSeconds,
            4 => Self::DayHoursMinutesSeconds,
            5 => Self::MonthDayHoursMinutesSeconds,
            6 => Self::YearMonthDayHoursMinutesSeconds,
            _ => Self::Off,
        }
    }
}

/// Value a field reads as outside calendar mode: that of 2000-01-01 00:00:00.
fn field_default(field: Field) -> u8 {
    field.get(CalendarTime::default().to_bits()) as u8
}

/// Getters and setters for each calendar field, on both CLOCK and ALARM0: `get_seconds`,
/// `set_seconds`, `get_alarm_seconds`, `set_alarm_seconds` and so on.
macro_rules! calendar_fields {
    ($($name:ident: $field:expr, $doc:literal);+ $(;)?) => {
        paste! {
            impl<H: Hardware> Rtc<H> {
                $(
                    #[doc = concat!("Clock ", $doc)]
                    pub fn [<get_ $name>](&mut self) -> u8 {
                        self.clock_field($field)
                    }

                    #[doc = concat!("Clock ", $doc)]
                    pub fn [<set_ $name>](&mut self, value: u8) {
                        self.set_clock_field($field, value);
                    }

                    #[doc = concat!("Alarm ", $doc)]
                    pub fn [<get_alarm_ $name>](&mut self) -> u8 {
                        self.alarm_field($field)
                    }

                    #[doc = concat!("Alarm ", $doc)]
                    pub fn [<set_alarm_ $name>](&mut self, value: u8) {
                        self.set_alarm_field($field, value);
                    }
                )+
            }
        }
    };
}

calendar_fields!(
    seconds: rtc::CLOCK_SECOND, "seconds, 0 through 59.";
    minutes: rtc::CLOCK_MINUTE, "minutes, 0 through 59.";
    hours: rtc::CLOCK_HOUR, "hours, 0 through 23.";
    day: rtc::CLOCK_DAY, "day of the month, from 1.";
    month: rtc::CLOCK_MONTH, "month, 1 through 12.";
    year: rtc::CLOCK_YEAR, "years since 2000, 0 through 63.";
);

impl<H: Hardware> Rtc<H> {
    pub(super) fn calendar_active(&self) -> bool {
        self.state.active() == Some(RtcMode::Clock)
    }

    fn clock_field(&mut self, field: Field) -> u8 {
        if !self.calendar_active() {
            return field_default(field);
        }
        field.get(self.read_synced(Reg::Mode2Clock)) as u8
    }

    fn set_clock_field(&mut self, field: Field, value: u8) {
        if !self.calendar_active() {
            return;
        }
        let clock = self.read_synced(Reg::Mode2Clock);
        self.write_synced(Reg::Mode2Clock, field.set(clock, value as u32));
    }

    // ALARM0 isn't read-synchronized; it holds whatever was last written.

    fn alarm_field(&mut self, field: Field) -> u8 {
        if !self.calendar_active() {
            return field_default(field);
        }
        field.get(self.hw.read(Reg::Mode2Alarm0)) as u8
    }

    fn set_alarm_field(&mut self, field: Field, value: u8) {
        if !self.calendar_active() {
            return;
        }
        let alarm = self.hw.read(Reg::Mode2Alarm0);
        self.write_synced(Reg::Mode2Alarm0, field.set(alarm, value as u32));
    }

    /// Set seconds, then minutes, then hours.
    pub fn set_time(&mut self, hours: u8, minutes: u8, seconds: u8) {
        self.set_seconds(seconds);
        self.set_minutes(minutes);
        self.set_hours(hours);
    }

    /// Set day, then month, then year.
    pub fn set_date(&mut self, day: u8, month: u8, year: u8) {
        self.set_day(day);
        self.set_month(month);
        self.set_year(year);
    }

    /// The whole date and time, from a single synchronized read.
    pub fn get_date_time(&mut self) -> CalendarTime {
        if !self.calendar_active() {
            return CalendarTime::default();
        }
        CalendarTime::from_bits(self.read_synced(Reg::Mode2Clock))
    }

    /// Set the whole date and time in a single write, so no field can roll over in between.
    pub fn set_date_time(&mut self, time: CalendarTime) {
        if self.calendar_active() {
            self.write_synced(Reg::Mode2Clock, time.to_bits());
        }
    }

    pub fn set_alarm_time(&mut self, hours: u8, minutes: u8, seconds: u8) {
        self.set_alarm_seconds(seconds);
        self.set_alarm_minutes(minutes);
        self.set_alarm_hours(hours);
    }

    pub fn set_alarm_date(&mut self, day: u8, month: u8, year: u8) {
        self.set_alarm_day(day);
        self.set_alarm_month(month);
        self.set_alarm_year(year);
    }

    /// All alarm fields.
    pub fn get_alarm(&mut self) -> CalendarTime {
        if !self.calendar_active() {
            return CalendarTime::default();
        }
        CalendarTime::from_bits(self.hw.read(Reg::Mode2Alarm0))
    }

    /// Start comparing the clock against the alarm, on the fields `granularity` selects.
    /// The alarm interrupt is already enabled by `begin`.
    pub fn enable_alarm(&mut self, granularity: AlarmMatch) {
        if self.calendar_active() {
            self.write_synced(Reg::Mode2Mask0, rtc::MASK_SEL.set(0, granularity as u32));
        }
    }

    /// Stop matching. The alarm fields are left as they are.
    pub fn disable_alarm(&mut self) {
        self.enable_alarm(AlarmMatch::Off);
    }

    /// The current match granularity; `Off` outside calendar mode.
    pub fn alarm_match(&mut self) -> AlarmMatch {
        if !self.calendar_active() {
            return AlarmMatch::Off;
        }
        AlarmMatch::from_bits(rtc::MASK_SEL.get(self.hw.read(Reg::Mode2Mask0)))
    }
}
