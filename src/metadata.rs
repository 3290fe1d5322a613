//! Parse tab-separated point metadata and compute per-column stats.
//!
//! Header rule: a first line with more than one column is the header; a
//! single-column file has no header and its column is named `label`.

use crate::types::ColumnStats;
use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};

/// Parsed metadata: ordered column names plus one map per point.
#[derive(Debug, Clone, Default)]
pub struct ParsedMetadata {
    pub column_names: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

/// Parse a metadata TSV body. Blank lines are skipped.
pub fn parse_metadata(content: &str) -> Result<ParsedMetadata> {
    let mut lines = content
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .peekable();

    let first = match lines.peek() {
        Some(first) => *first,
        None => return Ok(ParsedMetadata::default()),
    };

    let column_names: Vec<String> = if first.contains('\t') {
        // Multi-column file: first line is the header.
        lines
            .next()
            .unwrap_or_default()
            .split('\t')
            .map(str::to_string)
            .collect()
    } else {
        vec!["label".to_string()]
    };

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let values: Vec<&str> = line.split('\t').collect();
        if values.len() != column_names.len() {
            bail!(
                "metadata row {} has {} columns, expected {}",
                line_no + 1,
                values.len(),
                column_names.len()
            );
        }
        let row: HashMap<String, String> = column_names
            .iter()
            .cloned()
            .zip(values.iter().map(|v| v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(ParsedMetadata { column_names, rows })
}

/// Compute stats for every column: numeric min/max when all non-empty values
/// parse as numbers, and the distinct-value count either way.
pub fn analyze_metadata(metadata: &ParsedMetadata) -> Vec<ColumnStats> {
    metadata
        .column_names
        .iter()
        .map(|name| {
            let mut is_numeric = true;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            let mut seen: HashSet<&str> = HashSet::new();

            for row in &metadata.rows {
                let value = row.get(name).map(String::as_str).unwrap_or("");
                seen.insert(value);
                if value.is_empty() {
                    continue;
                }
                match value.parse::<f64>() {
                    Ok(v) => {
                        min = min.min(v);
                        max = max.max(v);
                    }
                    Err(_) => is_numeric = false,
                }
            }

            let has_numbers = is_numeric && min.is_finite();
            ColumnStats {
                name: name.clone(),
                is_numeric,
                min: has_numbers.then_some(min),
                max: has_numbers.then_some(max),
                num_unique: seen.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_has_no_header() {
        let parsed = parse_metadata("cat\ndog\ncat\n").unwrap();
        assert_eq!(parsed.column_names, vec!["label"]);
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.rows[0]["label"], "cat");
    }

    #[test]
    fn test_multi_column_first_line_is_header() {
        let parsed = parse_metadata("word\tfrequency\nthe\t1500\nof\t900\n").unwrap();
        assert_eq!(parsed.column_names, vec!["word", "frequency"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1]["word"], "of");
        assert_eq!(parsed.rows[1]["frequency"], "900");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let parsed = parse_metadata("\ncat\n\ndog\n\n").unwrap();
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = parse_metadata("a\tb\n1\t2\t3\n").unwrap_err();
        assert!(err.to_string().contains("columns"));
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_metadata("").unwrap();
        assert!(parsed.column_names.is_empty());
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn test_numeric_column_stats() {
        let parsed = parse_metadata("word\tfreq\nthe\t3\nof\t1\nto\t2\n").unwrap();
        let stats = analyze_metadata(&parsed);

        let word = &stats[0];
        assert_eq!(word.name, "word");
        assert!(!word.is_numeric);
        assert_eq!(word.num_unique, 3);
        assert!(word.min.is_none());

        let freq = &stats[1];
        assert!(freq.is_numeric);
        assert_eq!(freq.min, Some(1.0));
        assert_eq!(freq.max, Some(3.0));
    }

    #[test]
    fn test_empty_values_dont_break_numeric() {
        let parsed = parse_metadata("a\tb\n1\t\n2\tx\n").unwrap();
        let stats = analyze_metadata(&parsed);
        assert!(stats[0].is_numeric);
        assert_eq!(stats[0].min, Some(1.0));
        // Column b mixes empty and non-numeric: not numeric, no range.
        assert!(!stats[1].is_numeric);
        assert!(stats[1].min.is_none());
    }
}
