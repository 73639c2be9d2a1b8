use super::Formatter;
use crate::processing::Detection;

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, detection: &Detection) -> String {
        if self.verbose {
            format!(
                "{} at {:.3}s (sample {})",
                detection.key, detection.time_secs, detection.sample_index
            )
        } else {
            detection.key.to_string()
        }
    }

    fn inline(&self) -> bool {
        !self.verbose
    }
}
