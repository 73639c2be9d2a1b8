use super::Formatter;
use crate::processing::Detection;

/// One JSON object per line
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, detection: &Detection) -> String {
        serde_json::to_string(detection).unwrap_or_else(|e| {
            log::error!("failed to serialize detection: {}", e);
            String::new()
        })
    }
}
