use crate::error::{ProcessingError, Result};
use crate::models::{StationMap, StationName, StationStats};
use crate::utils::constants::FIELD_SEPARATOR;

/// How temperature fields are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Best effort: any field yields a number, malformed ones silently wrong.
    #[default]
    Lenient,
    /// Only `-?D{1,2}.D` is accepted; anything else aborts the run.
    Strict,
}

/// Split a record at its first `;`. Returns `None` when there is no separator.
pub fn split_record(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let sep = line.iter().position(|&b| b == FIELD_SEPARATOR)?;
    Some((&line[..sep], &line[sep + 1..]))
}

/// Parse a temperature field into tenths of a degree.
///
/// An optional leading `-` is honoured, `.` is skipped wherever it appears,
/// scanning stops at the first other non-digit byte or after three digits.
/// For well-formed input with one fractional digit the result is exact.
pub fn parse_tenths(field: &[u8]) -> i32 {
    let (negative, digits) = match field.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, field),
    };

    let mut value = 0i32;
    let mut count = 0;
    for &b in digits {
        if b == b'.' {
            continue;
        }
        if !b.is_ascii_digit() {
            break;
        }
        value = value * 10 + (b - b'0') as i32;
        count += 1;
        if count == 3 {
            break;
        }
    }

    if negative {
        -value
    } else {
        value
    }
}

/// Whether a field has exactly the shape `-?D{1,2}.D`.
pub fn is_well_formed(field: &[u8]) -> bool {
    let unsigned = field.strip_prefix(b"-").unwrap_or(field);
    match unsigned {
        [i, b'.', f] => i.is_ascii_digit() && f.is_ascii_digit(),
        [i1, i2, b'.', f] => i1.is_ascii_digit() && i2.is_ascii_digit() && f.is_ascii_digit(),
        _ => false,
    }
}

/// Parse one record and fold it into a chunk-local map.
///
/// Records without a separator are dropped. The station name is only copied
/// when it is new to `stats`.
pub fn fold_record(line: &[u8], stats: &mut StationMap, mode: ParseMode) -> Result<()> {
    let Some((name, field)) = split_record(line) else {
        return Ok(());
    };

    if mode == ParseMode::Strict && !is_well_formed(field) {
        return Err(ProcessingError::InvalidFormat(format!(
            "Invalid temperature '{}' for station '{}'",
            String::from_utf8_lossy(field),
            String::from_utf8_lossy(name)
        )));
    }

    let reading = parse_tenths(field);
    let name = StationName::new(name);
    match stats.get_mut(&name) {
        Some(existing) => existing.add(reading),
        None => {
            stats.insert(name.to_key(), StationStats::new(reading));
        }
    }

    Ok(())
}
