use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// one row of the change list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangeRecord {
    pub original_file: String,
    pub revision_code: String,
}

/// read the change list, keeping row order
/// columns are matched by header name, extra columns are ignored
pub fn load(path: &Path) -> Result<Vec<ChangeRecord>> {
    let wrap = |source| Error::ChangeList {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(wrap)?;

    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ChangeRecord>, _>>()
        .map_err(wrap)?;

    if records.is_empty() {
        return Err(Error::EmptyChangeList(path.to_path_buf()));
    }

    Ok(records)
}
