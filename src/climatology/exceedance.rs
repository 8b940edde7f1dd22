use chrono::Datelike;

use crate::climatology::error::ClimatologyError;
use crate::climatology::series::DailyReading;

/// Fraction of the month's historical days on which the value strictly
/// exceeded `threshold`, across every year in `readings`.
///
/// `Ok(None)` means no reading fell in `month` at all; "no data" is distinct
/// from a genuine 0.0 ("never exceeds") and callers must not collapse the two.
/// The result is never rounded here; presentation rounding belongs to the
/// caller.
pub fn exceedance_probability(
    readings: &[DailyReading],
    month: u32,
    threshold: f64,
) -> Result<Option<f64>, ClimatologyError> {
    if !(1..=12).contains(&month) {
        return Err(ClimatologyError::InvalidMonth(month));
    }

    let mut total = 0usize;
    let mut exceeded = 0usize;

    for reading in readings {
        if reading.date.month() != month {
            continue;
        }
        total += 1;
        if reading.value > threshold {
            exceeded += 1;
        }
    }

    if total == 0 {
        return Ok(None);
    }

    Ok(Some(exceeded as f64 / total as f64))
}
