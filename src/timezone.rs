//! Conversion of stored UTC timestamps into the server's local time.

use std::fmt;

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// The format used for displaying transaction dates, e.g. "2025-10-05 14:30".
const DISPLAY_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// A canonical timezone, e.g. "Asia/Taipei", used to display timestamps.
#[derive(Clone, Copy)]
pub struct LocalTimezone {
    tz: &'static Tz,
}

impl LocalTimezone {
    /// Look up a timezone by its canonical name.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if `canonical_timezone` is not a known timezone.
    pub fn from_name(canonical_timezone: &str) -> Result<Self, Error> {
        time_tz::timezones::get_by_name(canonical_timezone)
            .map(|tz| Self { tz })
            .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
    }

    /// The canonical name of the timezone.
    pub fn name(&self) -> &str {
        self.tz.name()
    }

    /// Convert `timestamp` to local time, taking daylight saving at that
    /// instant into account.
    pub fn to_local(&self, timestamp: OffsetDateTime) -> OffsetDateTime {
        let offset = self.tz.get_offset_utc(&timestamp).to_utc();
        timestamp.to_offset(offset)
    }

    /// Format `timestamp` as local time in the form "YYYY-MM-DD HH:MM".
    pub fn format_timestamp(&self, timestamp: OffsetDateTime) -> String {
        let local = self.to_local(timestamp);

        local.format(DISPLAY_FORMAT).unwrap_or_else(|error| {
            tracing::error!("could not format timestamp {local}: {error}");
            local.to_string()
        })
    }
}

impl fmt::Debug for LocalTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalTimezone").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{Error, timezone::LocalTimezone};

    #[test]
    fn formats_in_local_time() {
        let timezone = LocalTimezone::from_name("Asia/Taipei").unwrap();

        let formatted = timezone.format_timestamp(datetime!(2025-10-05 22:30:15 UTC));

        assert_eq!(formatted, "2025-10-06 06:30");
    }

    #[test]
    fn utc_is_unchanged() {
        let timezone = LocalTimezone::from_name("Etc/UTC").unwrap();

        let formatted = timezone.format_timestamp(datetime!(2025-01-31 09:05:59 UTC));

        assert_eq!(formatted, "2025-01-31 09:05");
    }

    #[test]
    fn daylight_saving_follows_the_timestamp() {
        let timezone = LocalTimezone::from_name("Pacific/Auckland").unwrap();

        // NZDT (+13) in January, NZST (+12) in July.
        assert_eq!(
            timezone.format_timestamp(datetime!(2025-01-15 00:00 UTC)),
            "2025-01-15 13:00"
        );
        assert_eq!(
            timezone.format_timestamp(datetime!(2025-07-15 00:00 UTC)),
            "2025-07-15 12:00"
        );
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = LocalTimezone::from_name("Middle/Earth");

        assert_eq!(
            result.map(|timezone| timezone.name().to_owned()),
            Err(Error::InvalidTimezone("Middle/Earth".to_owned()))
        );
    }
}
