//! Comma-separated tables.
//!
//! A table encodes as a `UniformList` of `List` rows. Each cell is sniffed on
//! its own: blank cells become `Empty`, then integers, then reals, and
//! anything else stays `Utf8`.
//!
//! ```rust
//! use serde_bof::adapter::tabular;
//! use serde_bof::{decode, Value};
//!
//! let bytes = tabular::encode_str("id,score,name\n1,9.5,\"Smith, J\"\n2,,x\n").unwrap();
//! let value = decode(&bytes).unwrap();
//! assert_eq!(value.as_list().unwrap()[1].as_list().unwrap()[1], Value::Real(9.5));
//! assert_eq!(
//!     tabular::decode_to_string(&bytes).unwrap(),
//!     "id,score,name\n1,9.5,Smith, J\n2,,x"
//! );
//! ```
//!
//! Rendering never quotes, so cells holding commas or newlines do not survive
//! a trip back to text.

use super::Adapter;
use crate::value::format_real;
use crate::{Error, Kind, Result, Value};
use num_bigint::BigInt;

/// Rows of cell text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Table { rows }
    }
}

/// Adapter between [`Table`] and [`Value`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TabularAdapter;

impl Adapter for TabularAdapter {
    type Tree = Table;

    fn encode_from(&self, table: &Table) -> Result<Value> {
        let rows = table
            .rows
            .iter()
            .map(|row| Value::List(row.iter().map(|cell| sniff_cell(cell)).collect()))
            .collect();
        Ok(Value::UniformList {
            kind: Kind::List,
            items: rows,
        })
    }

    fn decode_into(&self, value: Value) -> Result<Table> {
        let rows = match value.into_annotated() {
            Value::List(rows) | Value::UniformList { items: rows, .. } => rows,
            other => {
                return Err(Error::unsupported(format!(
                    "a table must be a list of rows, found {}",
                    other.kind()
                )))
            }
        };
        let rows = rows
            .into_iter()
            .map(|row| match row.into_annotated() {
                Value::List(cells) | Value::UniformList { items: cells, .. } => {
                    cells.iter().map(cell_text).collect::<Result<Vec<_>>>()
                }
                other => Err(Error::unsupported(format!(
                    "a table row must be a list, found {}",
                    other.kind()
                ))),
            })
            .collect::<Result<_>>()?;
        Ok(Table { rows })
    }
}

/// Picks the narrowest kind that reads `cell` back.
fn sniff_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Empty;
    }
    if let Ok(i) = trimmed.parse::<BigInt>() {
        return Value::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Real(f);
    }
    Value::Utf8(cell.to_string())
}

fn cell_text(cell: &Value) -> Result<String> {
    match cell.annotated() {
        Value::Empty => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Real(f) => Ok(format_real(*f)),
        Value::Utf8(s) => Ok(s.clone()),
        Value::List(items) => join_cells(items, ","),
        Value::UniformList { items, .. } => join_cells(items, "\n"),
        other => Err(Error::unsupported(format!(
            "a table cell cannot hold {}",
            other.kind()
        ))),
    }
}

/// Nested lists render inline, the way whole rows and tables do.
fn join_cells(items: &[Value], separator: &str) -> Result<String> {
    Ok(items
        .iter()
        .map(cell_text)
        .collect::<Result<Vec<_>>>()?
        .join(separator))
}

/// Splits comma-separated text into rows.
///
/// Fields may be wrapped in double quotes, which lets them hold commas,
/// newlines and `""` for a literal quote. Rows end at `\n`, `\r` or `\r\n`
/// and may differ in length. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`Error::Tabular`] if the reader fails.
pub fn parse_table(text: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let rows = reader
        .records()
        .map(|record| -> Result<Vec<String>> { Ok(record?.iter().map(String::from).collect()) })
        .collect::<Result<Vec<Vec<String>>>>()?;
    Ok(Table { rows })
}

/// Joins cells with `,` and rows with `\n`, without quoting.
#[must_use]
pub fn render_table(table: &Table) -> String {
    table
        .rows
        .iter()
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses comma-separated text and encodes it.
///
/// # Errors
///
/// Returns [`Error::Tabular`] if the text does not parse.
pub fn encode_str(text: &str) -> Result<Vec<u8>> {
    let table = parse_table(text)?;
    TabularAdapter.encode_tree(&table)
}

/// Decodes bytes and renders them as comma-separated text.
///
/// # Errors
///
/// Returns an error if the bytes do not decode or do not hold a list of rows
/// of scalar cells.
pub fn decode_to_string(data: &[u8]) -> Result<String> {
    let table = TabularAdapter.decode_tree(data)?;
    Ok(render_table(&table))
}
