use crate::error::Result;
use crate::models::{StationMap, StationStats};
use crate::utils::constants::ENTRY_SEPARATOR;
use std::fs::Permissions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Round to one decimal place, halves away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Displayed average: the sum in degrees is rounded first, then the quotient.
///
/// The two rounding steps are observable in the output and are kept as they
/// are rather than folded into one.
pub fn average(stats: &StationStats) -> f64 {
    let sum = round_one_decimal(stats.sum as f64 / 10.0);
    round_one_decimal(sum / stats.count as f64)
}

/// One fractional digit, `.` as decimal point, never `-0.0`.
pub fn format_value(value: f64) -> String {
    // adding zero turns -0.0 into 0.0
    format!("{:.1}", value + 0.0)
}

/// `name=min/avg/max` entries sorted by decoded name, joined by `", "`.
///
/// Names are ordered by their UTF-16 code units, which differs from code point
/// order only between supplementary-plane characters and U+E000..=U+FFFF.
pub fn format_report(stations: &StationMap) -> String {
    let mut entries: Vec<(String, &StationStats)> = stations
        .iter()
        .map(|(key, stats)| (key.name().into_owned(), stats))
        .collect();
    entries.sort_by(|a, b| a.0.encode_utf16().cmp(b.0.encode_utf16()));

    let mut report = String::with_capacity(entries.len() * 32);
    for (i, (name, stats)) in entries.iter().enumerate() {
        if i > 0 {
            report.push_str(ENTRY_SEPARATOR);
        }
        report.push_str(&format!(
            "{}={}/{}/{}",
            name,
            format_value(stats.min as f64 / 10.0),
            format_value(average(stats)),
            format_value(stats.max as f64 / 10.0)
        ));
    }
    report
}

pub struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render `stations` and replace `output` with the report.
    pub fn write_report(&self, stations: &StationMap, output: &Path) -> Result<String> {
        let report = format_report(stations);
        self.write_line(&report, output)?;
        Ok(report)
    }

    /// Write `line` as the sole content of `output`.
    ///
    /// The line goes to a temporary file next to `output` which is then
    /// renamed over it; a failed write leaves any previous report in place.
    pub fn write_line(&self, line: &str, output: &Path) -> Result<()> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(line.as_bytes())?;
        temp.flush()?;
        if let Some(permissions) = report_permissions(output)? {
            temp.as_file().set_permissions(permissions)?;
        }
        temp.persist(output).map_err(|e| e.error)?;

        debug!(output = %output.display(), bytes = line.len(), "report written");
        Ok(())
    }
}

/// Permissions for the replacement file: those of the report being replaced,
/// otherwise owner read-write and world-readable on unix.
fn report_permissions(output: &Path) -> Result<Option<Permissions>> {
    match std::fs::metadata(output) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use crate::utils::constants::DEFAULT_REPORT_MODE;
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(DEFAULT_REPORT_MODE))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
