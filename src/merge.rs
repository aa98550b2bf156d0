// src/merge.rs
//! Master table: row union of the harmonized series tables.

use crate::harmonize::union_columns;
use crate::store::DataSet;

/// Final sort key of the master table.
pub const MASTER_SORT: &[&str] = &["series", "year", "driver_name"];

/// Concatenate rows (no join) and sort by `MASTER_SORT`.
/// Inputs are expected to share one header; any stragglers are padded.
pub fn merge<'a>(tables: impl IntoIterator<Item = &'a DataSet>) -> DataSet {
    let tables: Vec<&DataSet> = tables.into_iter().collect();
    let columns = union_columns(tables.iter().copied());

    let mut master = DataSet::new(columns.clone());
    for t in &tables {
        if t.headers != columns {
            logw!("Merging a table whose header differs from the union ({} cols)", t.headers.len());
        }
        master.rows.extend(t.project(&columns).rows);
    }
    master.sort_by_cols(MASTER_SORT);
    logf!("Master table: {} rows, {} cols", master.len(), master.headers.len());
    master
}
