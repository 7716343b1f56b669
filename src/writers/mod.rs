pub mod report_writer;

pub use report_writer::{average, format_report, format_value, round_one_decimal, ReportWriter};
