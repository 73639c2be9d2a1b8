use super::Formatter;
use crate::processing::Detection;

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, detection: &Detection) -> String {
        format!(
            "{},{},{:.6}",
            detection.key, detection.sample_index, detection.time_secs
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("key,sample_index,time_secs")
    }
}
