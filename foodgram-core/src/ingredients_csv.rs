//! Parsing of the two-column ingredient seed file (`name,measurement_unit`).

use std::collections::HashSet;
use std::io::Read;

use csv::{ReaderBuilder, Trim};

use crate::error::CsvError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientRow {
    pub name: String,
    pub measurement_unit: String,
}

/// A row that could not be used, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedIngredients {
    /// Unique `(name, unit)` pairs in file order.
    pub rows: Vec<IngredientRow>,
    /// Pairs repeated within the file.
    pub duplicates: usize,
    pub skipped: Vec<SkippedRow>,
}

pub fn parse_ingredients<R: Read>(reader: R) -> Result<ParsedIngredients, CsvError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = ParsedIngredients::default();
    let mut seen = HashSet::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let (name, unit) = match (record.get(0), record.get(1)) {
            (Some(name), Some(unit)) => (name, unit),
            _ => {
                parsed.skipped.push(SkippedRow {
                    line,
                    reason: format!("expected 2 columns, got {}", record.len()),
                });
                continue;
            }
        };

        if name.is_empty() || unit.is_empty() {
            parsed.skipped.push(SkippedRow {
                line,
                reason: "blank name or measurement unit".to_string(),
            });
            continue;
        }

        let row = IngredientRow {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        };
        if seen.insert(row.clone()) {
            parsed.rows.push(row);
        } else {
            parsed.duplicates += 1;
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let data = "абрикосовое варенье,г\nмолоко, мл\n";
        let parsed = parse_ingredients(data.as_bytes()).unwrap();
        assert_eq!(
            parsed.rows,
            vec![
                IngredientRow {
                    name: "абрикосовое варенье".to_string(),
                    measurement_unit: "г".to_string(),
                },
                IngredientRow {
                    name: "молоко".to_string(),
                    measurement_unit: "мл".to_string(),
                },
            ]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_quoted_names_with_commas() {
        let parsed = parse_ingredients("\"соль, крупная\",г\n".as_bytes()).unwrap();
        assert_eq!(parsed.rows[0].name, "соль, крупная");
    }

    #[test]
    fn test_short_and_blank_rows_are_skipped() {
        let data = "flour,g\nonly-one-column\n,g\nsugar, \n";
        let parsed = parse_ingredients(data.as_bytes()).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.skipped.len(), 3);
        assert_eq!(parsed.skipped[0].line, 2);
    }

    #[test]
    fn test_duplicate_pairs_counted_once() {
        let data = "flour,g\nflour,g\nflour,kg\n";
        let parsed = parse_ingredients(data.as_bytes()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.duplicates, 1);
    }
}
