//! JSON rendering for assembled document bodies.

use crate::convert::ConversionOutput;
use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a conversion output (body and statistics) to JSON.
pub fn to_json(output: &ConversionOutput, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(output),
        JsonFormat::Compact => serde_json::to_string(output),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConversionStats;
    use crate::model::{DocumentBody, Heading};

    fn sample() -> ConversionOutput {
        let mut body = DocumentBody::new();
        body.push(Heading::with_text(1, "Hello").into());
        let mut stats = ConversionStats::new();
        stats.add_heading();
        ConversionOutput::new(body, stats)
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"heading\""));
        assert!(json.contains("Hello"));
        assert!(json.contains("\"heading_count\": 1"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
    }

    #[test]
    fn test_json_parses_back() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        let back: ConversionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats.heading_count, 1);
        assert_eq!(back.body.len(), 1);
    }
}
