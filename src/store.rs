// src/store.rs
//
// In-memory tables shared by every stage.
//
// - Cell:    one typed value; `Null` is the explicit missing marker and is
//            written to delimited text as an empty field.
// - DataSet: header row + rows of cells. Rows always have exactly
//            `headers.len()` cells.

use std::cmp::Ordering;
use std::fmt;

/// Text written for `Cell::Null`.
pub const NULL_MARKER: &str = "";

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool { matches!(self, Cell::Null) }

    pub fn text(s: impl Into<String>) -> Self { Cell::Text(s.into()) }

    /// `None` → `Null`; NaN is treated as missing too.
    pub fn float(v: Option<f64>) -> Self {
        match v {
            Some(x) if x.is_finite() => Cell::Float(x),
            _ => Cell::Null,
        }
    }

    pub fn int(v: Option<i64>) -> Self {
        v.map_or(Cell::Null, Cell::Int)
    }

    pub fn opt_text(v: Option<&str>) -> Self {
        match v {
            Some(s) if !s.is_empty() => Cell::Text(s.to_string()),
            _ => Cell::Null,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            Cell::Text(t) => t.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            Cell::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Read a raw delimited-text field. Only the null marker maps to `Null`;
    /// typing happens later, column by column.
    pub fn from_field(field: &str) -> Self {
        if field == NULL_MARKER { Cell::Null } else { Cell::Text(field.to_string()) }
    }

    /// Ordering used for table sorts: numbers before text, nulls last.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        use Cell::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Greater,
            (_, Null) => Ordering::Less,
            (Text(a), Text(b)) => a.cmp(b),
            (Text(_), _) => Ordering::Greater,
            (_, Text(_)) => Ordering::Less,
            (a, b) => {
                let (x, y) = (a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN));
                x.total_cmp(&y)
            }
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str(NULL_MARKER),
            Cell::Int(i) => write!(f, "{i}"),
            // Shortest round-trip repr; keeps re-runs byte-identical.
            Cell::Float(x) => write!(f, "{x:?}"),
            Cell::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl DataSet {
    pub fn new(headers: Vec<String>) -> Self { Self { headers, rows: Vec::new() } }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn col(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_col(&self, name: &str) -> bool { self.col(name).is_some() }

    /// Push a row, padding or truncating to the header width.
    /// Truncation drops data, so it is logged.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        let width = self.headers.len();
        if row.len() > width {
            let extra = row[width..].iter().filter(|c| !c.is_null()).count();
            if extra > 0 {
                logw!("Row {}: {} fields beyond the {width}-column header dropped", self.rows.len() + 1, extra);
            }
        }
        row.resize(width, Cell::Null);
        self.rows.push(row);
    }

    /// Borrow a cell by row index and column name.
    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let ix = self.col(name)?;
        self.rows.get(row).and_then(|r| r.get(ix))
    }

    /// Rename a column in place unless the target name already exists.
    /// Returns whether a rename happened.
    pub fn rename_col(&mut self, from: &str, to: &str) -> bool {
        if self.has_col(to) { return false; }
        match self.col(from) {
            Some(ix) => { self.headers[ix] = to.to_string(); true }
            None => false,
        }
    }

    /// Set every row of `name` to `value`, appending the column if absent.
    pub fn fill_col(&mut self, name: &str, value: Cell) {
        let ix = match self.col(name) {
            Some(ix) => ix,
            None => {
                self.headers.push(name.to_string());
                for r in &mut self.rows { r.push(Cell::Null); }
                self.headers.len() - 1
            }
        };
        for r in &mut self.rows { r[ix] = value.clone(); }
    }

    /// Reorder/restrict to `columns`. Unknown columns become all-null.
    pub fn project(&self, columns: &[String]) -> DataSet {
        let map: Vec<Option<usize>> = columns.iter().map(|c| self.col(c)).collect();
        let rows = self.rows.iter()
            .map(|r| map.iter().map(|ix| ix.map_or(Cell::Null, |i| r[i].clone())).collect())
            .collect();
        DataSet { headers: columns.to_vec(), rows }
    }

    /// Stable sort by the named columns (missing columns are skipped).
    pub fn sort_by_cols(&mut self, names: &[&str]) {
        let ixs: Vec<usize> = names.iter().filter_map(|n| self.col(n)).collect();
        self.rows.sort_by(|a, b| {
            ixs.iter()
                .map(|&i| a[i].sort_cmp(&b[i]))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Render all cells as text rows, for the delimited-text writer.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
    }
}
