//! Plain-text tables for terminal output

use unicode_width::UnicodeWidthStr;

/// Left-aligned columns padded to their widest cell
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<const N: usize>(headers: [&str; N]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<const N: usize>(&mut self, row: [String; N]) {
        self.rows.push(row.to_vec());
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.width());
                }
            }
        }
        widths
    }

    fn render_line(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate().take(widths.len()) {
            line.push_str(cell);
            if i + 1 < widths.len() {
                line.push_str(&" ".repeat(widths[i] - cell.width() + 2));
            }
        }
        line.truncate(line.trim_end().len());
        line.push('\n');
        line
    }

    /// Header, a rule, then one line per row
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = Self::render_line(&self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        out.push_str(&Self::render_line(&rule, &widths));
        for row in &self.rows {
            out.push_str(&Self::render_line(row, &widths));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_align() {
        let mut table = Table::new(["id", "label"]);
        table.push_row(["A".to_string(), "first".to_string()]);
        table.push_row(["Longer".to_string(), "x".to_string()]);

        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id      label");
        assert_eq!(lines[2], "A       first");
        assert_eq!(lines[3], "Longer  x");
    }

    #[test]
    fn test_wide_characters_count_by_display_width() {
        let mut table = Table::new(["id", "n"]);
        table.push_row(["日本".to_string(), "1".to_string()]);
        table.push_row(["ab".to_string(), "2".to_string()]);

        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "日本  1");
        assert_eq!(lines[3], "ab    2");
    }
}
