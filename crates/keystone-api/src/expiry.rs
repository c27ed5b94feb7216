use chrono::{DateTime, TimeDelta, Utc};
use keystone_common::error::DecodeError;
use keystone_common::value::{ConversionError, WireValue};
use smol_str::ToSmolStr;

/// Turn a relative "seconds from now" field into an absolute timestamp.
///
/// Absent or `null` stays absent. Anything present must be a finite number of
/// seconds, either as a JSON number or as decimal text; fractions are kept to
/// the millisecond.
pub(crate) fn expires_at(
    field: &'static str,
    raw: Option<&WireValue>,
) -> Result<Option<DateTime<Utc>>, DecodeError> {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let seconds = raw
        .to_f64()
        .map_err(|source| DecodeError::InvalidField { field, source })?;

    let out_of_range = || DecodeError::InvalidField {
        field,
        source: ConversionError::InvalidNumber {
            value: seconds.to_smolstr(),
        },
    };
    let millis = (seconds * 1000.0).round();
    if !(i64::MIN as f64..=i64::MAX as f64).contains(&millis) {
        return Err(out_of_range());
    }
    let delta = TimeDelta::try_milliseconds(millis as i64).ok_or_else(out_of_range)?;
    Utc::now()
        .checked_add_signed(delta)
        .map(Some)
        .ok_or_else(out_of_range)
}
