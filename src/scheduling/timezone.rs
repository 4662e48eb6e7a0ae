//! Wall-clock timezone conversion for schedule times.
//!
//! Users enter schedule times in their own timezone; the task table stores
//! everything in UTC. Conversion anchors the wall-clock time to a concrete
//! date (today by default) so that DST offsets resolve the way the zone
//! actually observes them. Only the time of day survives the conversion;
//! day, month, and weekday cron fields are left untouched by callers.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use thiserror::Error;

/// Canonical name of the storage timezone.
pub const UTC: &str = "UTC";

/// Reasons a wall-clock conversion fails.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("unknown timezone '{name}'")]
    UnknownZone {
        name: String,
        #[source]
        source: jiff::Error,
    },

    #[error("no wall-clock time {hour:02}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },

    #[error("cannot resolve {hour:02}:{minute:02} in '{zone}'")]
    Unrepresentable {
        hour: u8,
        minute: u8,
        zone: String,
        #[source]
        source: jiff::Error,
    },
}

/// Whether `zone` names a timezone the conversion layer can resolve.
pub fn is_known(zone: &str) -> bool {
    zone == UTC || TimeZone::get(zone).is_ok()
}

/// Converts a wall-clock time in `source_zone` to UTC, anchored to today.
///
/// When `source_zone` is already UTC this is the identity and returns
/// immediately, whatever the inputs. "Today" is today in the source zone,
/// so the offset in effect right now is the one applied.
pub fn to_utc(hour: u8, minute: u8, source_zone: &str) -> Result<(u8, u8), ConversionError> {
    if source_zone == UTC {
        return Ok((hour, minute));
    }
    let tz = lookup(source_zone)?;
    let today = Timestamp::now().to_zoned(tz.clone()).date();
    convert(today, hour, minute, &tz, source_zone, TimeZone::UTC)
}

/// Like [`to_utc`], but anchored to an explicit date interpreted in the
/// source zone. The entry point for deterministic conversion.
pub fn to_utc_on(
    date: Date,
    hour: u8,
    minute: u8,
    source_zone: &str,
) -> Result<(u8, u8), ConversionError> {
    if source_zone == UTC {
        return Ok((hour, minute));
    }
    let tz = lookup(source_zone)?;
    convert(date, hour, minute, &tz, source_zone, TimeZone::UTC)
}

/// Converts a UTC wall-clock time to `target_zone`, anchored to today.
///
/// The inverse of [`to_utc`], used when showing stored schedules back in
/// the configured timezone.
pub fn to_local(
    utc_hour: u8,
    utc_minute: u8,
    target_zone: &str,
) -> Result<(u8, u8), ConversionError> {
    if target_zone == UTC {
        return Ok((utc_hour, utc_minute));
    }
    let tz = lookup(target_zone)?;
    let today = Timestamp::now().to_zoned(TimeZone::UTC).date();
    convert(today, utc_hour, utc_minute, &TimeZone::UTC, UTC, tz)
}

/// Like [`to_local`], but anchored to an explicit UTC date.
pub fn to_local_on(
    date: Date,
    utc_hour: u8,
    utc_minute: u8,
    target_zone: &str,
) -> Result<(u8, u8), ConversionError> {
    if target_zone == UTC {
        return Ok((utc_hour, utc_minute));
    }
    let tz = lookup(target_zone)?;
    convert(date, utc_hour, utc_minute, &TimeZone::UTC, UTC, tz)
}

fn lookup(zone: &str) -> Result<TimeZone, ConversionError> {
    TimeZone::get(zone).map_err(|source| ConversionError::UnknownZone {
        name: zone.to_string(),
        source,
    })
}

fn convert(
    date: Date,
    hour: u8,
    minute: u8,
    from: &TimeZone,
    from_name: &str,
    to: TimeZone,
) -> Result<(u8, u8), ConversionError> {
    if hour > 23 || minute > 59 {
        return Err(ConversionError::InvalidTime { hour, minute });
    }
    let zoned = date
        .at(hour as i8, minute as i8, 0, 0)
        .to_zoned(from.clone())
        .map_err(|source| ConversionError::Unrepresentable {
            hour,
            minute,
            zone: from_name.to_string(),
            source,
        })?;
    let shifted = zoned.with_time_zone(to);
    Ok((shifted.hour() as u8, shifted.minute() as u8))
}

/// Timezones offered for selection, UTC first.
///
/// A curated subset of the IANA database covering the regions the service
/// is deployed in. Any valid IANA name is accepted by the conversion
/// functions; this list only feeds dropdowns.
pub fn timezone_choices() -> &'static [&'static str] {
    &[
        UTC,
        "US/Eastern",
        "US/Central",
        "US/Mountain",
        "US/Pacific",
        "US/Alaska",
        "US/Hawaii",
        "America/New_York",
        "America/Chicago",
        "America/Denver",
        "America/Los_Angeles",
        "America/Phoenix",
        "America/Anchorage",
        "America/Toronto",
        "America/Vancouver",
        "America/Mexico_City",
        "America/Sao_Paulo",
        "America/Argentina/Buenos_Aires",
        "Europe/London",
        "Europe/Paris",
        "Europe/Berlin",
        "Europe/Madrid",
        "Europe/Rome",
        "Europe/Amsterdam",
        "Europe/Stockholm",
        "Europe/Moscow",
        "Asia/Tokyo",
        "Asia/Shanghai",
        "Asia/Kolkata",
        "Asia/Dubai",
        "Australia/Sydney",
        "Australia/Melbourne",
        "Pacific/Auckland",
    ]
}
