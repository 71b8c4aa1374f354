use crate::error::{PipelineError, Result};
use crate::models::RawRecord;

const DELIMITER: char = ',';

/// Parse comma-delimited text into raw records.
///
/// The first non-blank line is the header. Blank lines are skipped, every
/// header name and cell is trimmed, short rows are padded with `""` and extra
/// cells are dropped. Quoting is not supported: a cell containing a comma
/// splits.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>> {
    // Spreadsheet exports often lead with a byte-order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header_line = lines
        .next()
        .ok_or_else(|| PipelineError::EmptyInput("no header row".to_string()))?;
    let headers: Vec<&str> = header_line.split(DELIMITER).map(str::trim).collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(PipelineError::EmptyInput(
            "header row has no column names".to_string(),
        ));
    }

    let records: Vec<RawRecord> = lines
        .map(|line| {
            let cells: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
            headers
                .iter()
                .enumerate()
                // Unnamed columns cannot be resolved by the normalizer
                .filter(|(_, h)| !h.is_empty())
                .map(|(i, h)| (*h, cells.get(i).copied().unwrap_or("")))
                .collect()
        })
        .collect();

    if records.is_empty() {
        return Err(PipelineError::EmptyInput(
            "header row but no data rows".to_string(),
        ));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let csv = "city,state,violentCrime\nSpringfield,IL,100\nShelbyville,IL,10\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("city"), Some("Springfield"));
        assert_eq!(rows[1].get("violentCrime"), Some("10"));
    }

    #[test]
    fn test_trims_and_skips_blank_lines() {
        let csv = "\n\n  city , state \r\n\r\n  Springfield ,  IL \r\n   \n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("city"), Some("Springfield"));
        assert_eq!(rows[0].get("state"), Some("IL"));
    }

    #[test]
    fn test_short_row_padded_and_extra_cells_dropped() {
        let rows = parse_csv("city,state,note\nSpringfield\nOgdenville,IL,x,y,z").unwrap();
        assert_eq!(rows[0].get("state"), Some(""));
        assert_eq!(rows[0].get("note"), Some(""));
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[1].get("note"), Some("x"));
    }

    #[test]
    fn test_embedded_delimiter_splits() {
        let rows = parse_csv("city,state,note\nSpringfield,IL,big, scary").unwrap();
        assert_eq!(rows[0].get("note"), Some("big"));
    }

    #[test]
    fn test_strips_byte_order_mark() {
        let rows = parse_csv("\u{feff}city,state,violentCrime\nSpringfield,IL,100\n").unwrap();
        assert_eq!(rows[0].get("city"), Some("Springfield"));
        assert_eq!(rows[0].get("violentCrime"), Some("100"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_csv(""), Err(PipelineError::EmptyInput(_))));
        assert!(matches!(parse_csv("  \n \n"), Err(PipelineError::EmptyInput(_))));
    }

    #[test]
    fn test_header_only() {
        assert!(matches!(
            parse_csv("city,state\n\n"),
            Err(PipelineError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_blank_header_names() {
        assert!(matches!(
            parse_csv(" , ,\nSpringfield,IL"),
            Err(PipelineError::EmptyInput(_))
        ));
    }
}
