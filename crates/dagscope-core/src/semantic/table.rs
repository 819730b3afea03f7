use serde::{Deserialize, Serialize};

/// A small table of already formatted cells.
///
/// Used both for the sampled output rows of an operator and for the check
/// summary. Cells are strings because the engine formats values (arrays,
/// nulls, floats) before handing them over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row (builder style). Missing trailing cells are filled with
    /// empty strings, extra cells are dropped.
    pub fn with_row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(row);
        self
    }

    /// Appends a row, padded or truncated to the column count.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row
            .into_iter()
            .take(self.columns.len())
            .map(Into::into)
            .collect();
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_normalized_to_column_count() {
        let table = Table::new(["a", "b"])
            .with_row(["1"])
            .with_row(["1", "2", "3"]);

        assert_eq!(table.rows()[0], vec!["1".to_string(), String::new()]);
        assert_eq!(table.rows()[1], vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(["only"]);
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["only".to_string()]);
    }
}
