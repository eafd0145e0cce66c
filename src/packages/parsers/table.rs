/// One data row of a `|` table, addressable by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<(String, String)>,
}

impl TableRow {
    /// Cell under the header `column` (case-insensitive).
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(column))
            .map(|(_, value)| value.as_str())
    }

    /// First non-empty cell among alternative header spellings.
    pub fn get_any(&self, columns: &[&str]) -> Option<&str> {
        columns
            .iter()
            .filter_map(|c| self.get(c))
            .find(|v| !v.is_empty())
    }
}

fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.contains('-')
        && trimmed.chars().all(|c| matches!(c, '-' | '+' | '|' | ' '))
}

fn split_cells(line: &str) -> Vec<String> {
    line.split('|').map(|c| c.trim().to_string()).collect()
}

/// Parse a table of the form printed by zypper:
///
/// ```text
/// S  | Name | Summary | Type
/// ---+------+---------+--------
/// i+ | curl | A tool  | package
/// ```
///
/// The header is the line directly above the first separator line. Rows
/// with fewer cells than the header are dropped. Text before the header and
/// lines without `|` are ignored.
pub fn parse_pipe_table(text: &str) -> Vec<TableRow> {
    let lines: Vec<&str> = text.lines().collect();

    let Some(sep_index) = lines.iter().position(|l| is_separator_line(l)) else {
        return Vec::new();
    };
    if sep_index == 0 || !lines[sep_index - 1].contains('|') {
        return Vec::new();
    }

    let headers = split_cells(lines[sep_index - 1]);
    let mut rows = Vec::new();

    for line in &lines[sep_index + 1..] {
        if !line.contains('|') || is_separator_line(line) {
            continue;
        }
        let cells = split_cells(line);
        if cells.len() < headers.len() {
            continue;
        }
        rows.push(TableRow {
            cells: headers.iter().cloned().zip(cells).collect(),
        });
    }

    rows
}
