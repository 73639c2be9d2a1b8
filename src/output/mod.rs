mod csv;
mod json;
mod text;

use crate::processing::Detection;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

pub trait Formatter: Send {
    fn format(&self, detection: &Detection) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }

    /// Whether records are written back to back rather than one per line
    fn inline(&self) -> bool {
        false
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtmf::DtmfKey;

    fn detection(c: char) -> Detection {
        Detection {
            key: DtmfKey::try_from(c).unwrap(),
            sample_index: 4000,
            time_secs: 0.5,
        }
    }

    #[test]
    fn test_text_is_bare_symbol() {
        let f = create_formatter(OutputFormat::Text, false);
        assert_eq!(f.format(&detection('#')), "#");
        assert!(f.inline());
    }

    #[test]
    fn test_text_verbose() {
        let f = create_formatter(OutputFormat::Text, true);
        assert_eq!(f.format(&detection('7')), "7 at 0.500s (sample 4000)");
        assert!(!f.inline());
    }

    #[test]
    fn test_json_record() {
        let f = create_formatter(OutputFormat::Json, false);
        let value: serde_json::Value = serde_json::from_str(&f.format(&detection('A'))).unwrap();
        assert_eq!(value["key"], "A");
        assert_eq!(value["sample_index"], 4000);
        assert_eq!(value["time_secs"], 0.5);
    }

    #[test]
    fn test_csv_record() {
        let f = create_formatter(OutputFormat::Csv, false);
        assert_eq!(f.header(), Some("key,sample_index,time_secs"));
        assert_eq!(f.format(&detection('*')), "*,4000,0.500000");
    }
}
