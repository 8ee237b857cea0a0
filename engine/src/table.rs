//! Column-aligned text tables for help output.

/// Default gap between columns.
const COLUMN_SEPARATOR: &str = "  ";

/// Rows of text cells rendered with every column padded to its widest cell.
///
/// The last cell of a row is never padded, so lines carry no trailing
/// whitespace. Widths are measured in characters.
///
/// # Examples
///
/// ```
/// use cmdtree::Table;
///
/// let mut table = Table::new();
/// table.row(["env*", "string", "Target environment"]);
/// table.row(["verbose", "bool", "Print more"]);
///
/// assert_eq!(
///     table.lines(),
///     vec![
///         "env*     string  Target environment",
///         "verbose  bool    Print more",
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders each row as one line.
    pub fn lines(&self) -> Vec<String> {
        let widths = self.column_widths();

        self.rows
            .iter()
            .map(|row| {
                let last = row.len().saturating_sub(1);
                let mut line = String::new();
                for (i, cell) in row.iter().enumerate() {
                    if i == last {
                        line.push_str(cell);
                    } else {
                        line.push_str(&format!("{cell:<width$}", width = widths[i]));
                        line.push_str(COLUMN_SEPARATOR);
                    }
                }
                line
            })
            .collect()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let width = cell.chars().count();
                match widths.get_mut(i) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width),
                }
            }
        }
        widths
    }
}
