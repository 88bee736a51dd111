use crossterm::terminal;

use crate::cli::io;

const FALLBACK_WIDTH: usize = 100;
const MIN_FLEX_WIDTH: usize = 8;

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
    /// Flexible columns absorb whatever terminal width the fixed ones leave.
    pub flex: bool,
    pub align_right: bool,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
            flex: false,
            align_right: false,
        }
    }

    pub fn flex(mut self) -> Self {
        self.flex = true;
        self
    }

    pub fn right(mut self) -> Self {
        self.align_right = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders to lines no wider than `max_width`.
    pub fn render_lines(&self, max_width: usize) -> Vec<String> {
        let widths = self.column_widths(max_width);
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header.as_str()).collect();
        lines.push(self.render_row(&headers, &widths));
        lines.push("-".repeat(widths.iter().map(|w| w + 1).sum::<usize>().saturating_sub(1)));
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.render_row(&cells, &widths));
        }
        lines
    }

    pub fn print(&self) {
        for line in self.render_lines(terminal_width()) {
            io::print_info(line);
        }
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let fixed: usize = self
            .columns
            .iter()
            .filter(|c| !c.flex)
            .map(|c| c.width + 1)
            .sum();
        let flex_count = self.columns.iter().filter(|c| c.flex).count().max(1);
        let spare = max_width.saturating_sub(fixed) / flex_count;
        self.columns
            .iter()
            .map(|column| {
                if column.flex {
                    spare.saturating_sub(1).max(MIN_FLEX_WIDTH).min(column.width)
                } else {
                    column.width
                }
            })
            .collect()
    }

    fn render_row(&self, cells: &[&str], widths: &[usize]) -> String {
        let mut line = String::new();
        for (idx, (column, width)) in self.columns.iter().zip(widths).enumerate() {
            if idx > 0 {
                line.push(' ');
            }
            let cell = truncate(cells.get(idx).copied().unwrap_or(""), *width);
            if column.align_right {
                line.push_str(&format!("{:>width$}", cell, width = width));
            } else {
                line.push_str(&format!("{:width$}", cell, width = width));
            }
        }
        line.trim_end().to_string()
    }
}

/// Current terminal width, or a fixed fallback when stdout is not a terminal.
pub fn terminal_width() -> usize {
    terminal::size()
        .map(|(cols, _)| cols as usize)
        .ok()
        .filter(|cols| *cols > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

/// Shortens `value` to `width` characters, marking the cut with `~`.
pub fn truncate(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return value.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = value.chars().take(width - 1).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec![
            TableColumn::new("ID", 4),
            TableColumn::new("Description", 40).flex(),
            TableColumn::new("Amount", 10).right(),
        ]);
        table.add_row(vec!["1", "A very long description of a mountain lodge stay", "USD 60.00"]);
        table
    }

    #[test]
    fn flex_column_shrinks_to_fit() {
        let lines = sample().render_lines(40);
        assert!(lines.iter().all(|line| line.chars().count() <= 40));
        assert!(lines[2].contains('~'));
        assert!(lines[2].ends_with("USD 60.00"));
    }

    #[test]
    fn wide_terminals_keep_declared_width() {
        let lines = sample().render_lines(200);
        assert!(lines[2].contains("A very long description of a mountain l~"));
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Café au lait", 4), "Caf~");
        assert_eq!(truncate("Tea", 4), "Tea");
    }
}
