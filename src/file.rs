// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::csv::{self, Delim};
use crate::error::{Error, Result};
use crate::store::DataSet;

/// Read a delimited table with a header row.
/// Absent file → `MissingInput` naming the expected path.
pub fn read_table(path: &Path, delim: Delim) -> Result<DataSet> {
    if !path.is_file() {
        return Err(Error::MissingInput { path: path.to_path_buf() });
    }
    let text = fs::read_to_string(path)?;
    let ds = csv::parse_table(&text, delim);
    logd!("Read {} ({} rows, {} cols)", path.display(), ds.len(), ds.headers.len());
    Ok(ds)
}

/// Create/truncate `path` and write header + rows.
pub fn write_table(path: &Path, ds: &DataSet, delim: Delim) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(path, csv::table_to_string(ds, delim))?; // truncate/overwrite
    logf!("Wrote {} (rows={}, cols={})", path.display(), ds.len(), ds.headers.len());
    Ok(path.to_path_buf())
}

/// Pick the delimiter from a file extension; anything but `.tsv` is CSV.
pub fn delim_for(path: &Path) -> Delim {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => Delim::Tsv,
        _ => Delim::Csv,
    }
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Cell;

    #[test]
    fn missing_file_names_the_path() {
        let err = read_table(Path::new("no/such/dir/f1.csv"), Delim::Csv).unwrap_err();
        assert!(err.to_string().contains("no/such/dir/f1.csv"));
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("t.csv");
        let mut ds = DataSet::new(strings!["a", "b"]);
        ds.push_row(vec![Cell::Int(1), Cell::Null]);
        write_table(&path, &ds, Delim::Csv).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), csv::table_to_string(&ds, Delim::Csv));
        let back = read_table(&path, Delim::Csv).unwrap();
        assert_eq!(back.headers, ds.headers);
        assert_eq!(back.rows[0], vec![Cell::text("1"), Cell::Null]);
    }

    #[test]
    fn tsv_extension_selects_tab() {
        assert_eq!(delim_for(Path::new("x/y.TSV")), Delim::Tsv);
        assert_eq!(delim_for(Path::new("x/y.txt")), Delim::Csv);
    }
}
