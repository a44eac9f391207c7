//! Flat-row model and CSV rendering.
//!
//! The quoting rule is deliberately asymmetric, for byte-for-byte parity
//! with the exports the admin console users already consume: string cells
//! are always double-quoted (embedded quotes doubled), while booleans,
//! integers and absent values are written bare. Numeric and boolean cells
//! can never contain a comma or quote, so the output stays structurally
//! valid despite not being RFC 4180.

use serde::Serialize;

/// One cell of a flat row. Booleans and integers keep their native type
/// until rendering so they are emitted unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// An absent value; renders as a bare empty cell.
    Empty,
    Bool(bool),
    Int(i64),
    /// Any string value, including JSON-stringified sub-fields; always
    /// rendered quoted.
    Text(String),
}

impl Cell {
    /// An optional value without a fallback: missing renders as a bare
    /// empty cell.
    pub fn opt<T: Into<Cell>>(value: Option<T>) -> Cell {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }

    /// An optional string field the source treats as always-string:
    /// missing renders as a quoted empty string rather than a bare cell.
    pub fn or_blank(value: Option<String>) -> Cell {
        Cell::Text(value.unwrap_or_default())
    }

    /// A nested object or array, JSON-stringified into a text cell.
    pub fn json<T: Serialize>(value: &T) -> Cell {
        Cell::Text(serde_json::to_string(value).unwrap_or_default())
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Cell {
        Cell::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Cell {
        Cell::Int(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Cell {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Cell {
        Cell::Text(value.to_owned())
    }
}

fn push_cell(out: &mut String, cell: &Cell) {
    match cell {
        Cell::Empty => {}
        Cell::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        Cell::Int(value) => out.push_str(&value.to_string()),
        Cell::Text(value) => {
            out.push('"');
            for character in value.chars() {
                if character == '"' {
                    out.push('"');
                }
                out.push(character);
            }
            out.push('"');
        }
    }
}

/// Render a header row plus data rows: rows joined by CRLF, cells by
/// commas, no trailing newline.
pub fn to_csv(headers: &[&str], rows: &[Vec<Cell>]) -> String {
    let mut out = String::new();
    for (index, header) in headers.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        push_cell(&mut out, &Cell::from(*header));
    }
    for row in rows {
        out.push_str("\r\n");
        for (index, cell) in row.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            push_cell(&mut out, cell);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(cell: Cell) -> String {
        let mut out = String::new();
        push_cell(&mut out, &cell);
        out
    }

    #[test]
    fn strings_are_quoted_and_quotes_doubled() {
        assert_eq!(rendered(Cell::from("plain")), "\"plain\"");
        assert_eq!(rendered(Cell::from("a \"b\" c")), "\"a \"\"b\"\" c\"");
        assert_eq!(rendered(Cell::from("one,two")), "\"one,two\"");
        assert_eq!(rendered(Cell::Text(String::new())), "\"\"");
    }

    #[test]
    fn non_strings_are_rendered_bare() {
        assert_eq!(rendered(Cell::Bool(true)), "true");
        assert_eq!(rendered(Cell::Bool(false)), "false");
        assert_eq!(rendered(Cell::Int(42)), "42");
        assert_eq!(rendered(Cell::Int(-7)), "-7");
        assert_eq!(rendered(Cell::Empty), "");
    }

    #[test]
    fn missing_values_never_render_as_null_literals() {
        assert_eq!(rendered(Cell::opt::<i64>(None)), "");
        assert_eq!(rendered(Cell::opt::<bool>(None)), "");
        assert_eq!(rendered(Cell::or_blank(None)), "\"\"");
    }

    #[test]
    fn rows_are_joined_by_crlf_without_a_trailing_newline() {
        let csv = to_csv(
            &["id", "name", "active"],
            &[
                vec![Cell::Int(1), Cell::from("first"), Cell::Bool(true)],
                vec![Cell::Int(2), Cell::or_blank(None), Cell::Empty],
            ],
        );
        assert_eq!(
            csv,
            "\"id\",\"name\",\"active\"\r\n1,\"first\",true\r\n2,\"\","
        );
    }

    #[test]
    fn header_only_output_has_no_newline() {
        assert_eq!(to_csv(&["a", "b"], &[]), "\"a\",\"b\"");
    }

    // Inverse of the asymmetric quoting rule, used to check round-trips.
    fn parse_row(line: &str) -> Vec<Cell> {
        let mut cells = Vec::new();
        let mut chars = line.chars().peekable();
        loop {
            match chars.peek() {
                Some('"') => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some('"') => {
                                if chars.peek() == Some(&'"') {
                                    chars.next();
                                    value.push('"');
                                } else {
                                    break;
                                }
                            }
                            Some(other) => value.push(other),
                            None => break,
                        }
                    }
                    cells.push(Cell::Text(value));
                    // skip the separator, if any
                    chars.next();
                }
                _ => {
                    let mut raw = String::new();
                    loop {
                        match chars.next() {
                            Some(',') | None => break,
                            Some(other) => raw.push(other),
                        }
                    }
                    cells.push(match raw.as_str() {
                        "" => Cell::Empty,
                        "true" => Cell::Bool(true),
                        "false" => Cell::Bool(false),
                        _ => Cell::Int(raw.parse().expect("bare cells are integers")),
                    });
                    if chars.peek().is_none() {
                        break;
                    }
                    continue;
                }
            }
            if chars.peek().is_none() {
                break;
            }
        }
        cells
    }

    #[test]
    fn serialized_rows_round_trip_through_the_quoting_rule() {
        let rows = vec![
            vec![
                Cell::from("embedded \"quotes\""),
                Cell::Int(123),
                Cell::Bool(false),
            ],
            vec![Cell::from("comma, inside"), Cell::Int(-5), Cell::Bool(true)],
        ];
        let csv = to_csv(&["a", "b", "c"], &rows);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(parse_row(lines[1]), rows[0]);
        assert_eq!(parse_row(lines[2]), rows[1]);
    }
}
