use crate::changelist::ChangeRecord;
use crate::constants::{BACKUP_SUFFIX, REVISION_MARKER};
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// a file that was renamed, as named in the change list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameMapping {
    pub original_file: String,
    pub new_file: String,
}

/// insert `_rev<revision>` before the extension of the last path component
///
/// the extension starts at the last dot, unless only dots come before it
/// (`.bashrc` has no extension, `archive.tar.gz` has `.gz`)
pub fn revised_name(original_file: &str, revision_code: &str) -> String {
    let base_start = original_file.rfind('/').map_or(0, |i| i + 1);
    let base = &original_file[base_start..];

    let split = base
        .rfind('.')
        .filter(|&dot| base[..dot].chars().any(|c| c != '.'))
        .map_or(original_file.len(), |dot| base_start + dot);

    let (stem, ext) = original_file.split_at(split);
    format!("{stem}{REVISION_MARKER}{revision_code}{ext}")
}

/// back up and rename every file in the change list, in order
///
/// stops at the first failure; `mapping` keeps the renames done so far
pub fn rename_all(
    records: &[ChangeRecord],
    drawing_dir: &Path,
    mapping: &mut Vec<RenameMapping>,
) -> Result<()> {
    for record in records {
        mapping.push(rename_one(record, drawing_dir)?);
    }
    Ok(())
}

fn rename_one(record: &ChangeRecord, drawing_dir: &Path) -> Result<RenameMapping> {
    let source = drawing_dir.join(&record.original_file);
    if !source.exists() {
        return Err(Error::SourceMissing {
            file: record.original_file.clone(),
            dir: drawing_dir.to_path_buf(),
        });
    }

    let new_file = revised_name(&record.original_file, &record.revision_code);
    let target = drawing_dir.join(&new_file);

    let backup = backup_path(&source);
    fs::copy(&source, &backup).map_err(|e| Error::io("back up", &source, e))?;
    fs::rename(&source, &target).map_err(|e| Error::io("rename", &source, e))?;

    Ok(RenameMapping {
        original_file: record.original_file.clone(),
        new_file,
    })
}

/// `<path>.bak`, appended rather than replacing the extension
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(original_file: &str, revision_code: &str) -> ChangeRecord {
        ChangeRecord {
            original_file: original_file.to_string(),
            revision_code: revision_code.to_string(),
        }
    }

    #[test]
    fn test_revised_name() {
        let cases = [
            ("panel.dwg", "B2", "panel_revB2.dwg"),
            ("part.dwg", "A1", "part_revA1.dwg"),
            ("archive.tar.gz", "3", "archive.tar_rev3.gz"),
            ("README", "A", "README_revA"),
            (".bashrc", "1", ".bashrc_rev1"),
            ("..hidden.dwg", "1", "..hidden_rev1.dwg"),
            ("sub/part.dwg", "C", "sub/part_revC.dwg"),
            ("v1.2/notes", "D", "v1.2/notes_revD"),
            ("trailing.", "E", "trailing_revE."),
        ];

        for (original, revision, expected) in cases {
            assert_eq!(
                revised_name(original, revision),
                expected,
                "{original} + {revision}"
            );
        }
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("drawings/panel.dwg")),
            PathBuf::from("drawings/panel.dwg.bak")
        );
    }

    #[test]
    fn test_rename_creates_backup_and_moves_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("panel.dwg"), "panel geometry").unwrap();

        let mut mapping = Vec::new();
        rename_all(&[record("panel.dwg", "B2")], dir, &mut mapping).unwrap();

        assert_eq!(
            mapping,
            vec![RenameMapping {
                original_file: "panel.dwg".to_string(),
                new_file: "panel_revB2.dwg".to_string(),
            }]
        );
        assert!(!dir.join("panel.dwg").exists());
        assert_eq!(
            fs::read_to_string(dir.join("panel.dwg.bak")).unwrap(),
            "panel geometry"
        );
        assert_eq!(
            fs::read_to_string(dir.join("panel_revB2.dwg")).unwrap(),
            "panel geometry"
        );
    }

    #[test]
    fn test_mapping_follows_input_order() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let records = [
            record("c.dwg", "1"),
            record("a.dwg", "2"),
            record("b.dwg", "3"),
        ];
        for r in &records {
            fs::write(dir.join(&r.original_file), &r.original_file).unwrap();
        }

        let mut mapping = Vec::new();
        rename_all(&records, dir, &mut mapping).unwrap();

        let new_files: Vec<_> = mapping.iter().map(|m| m.new_file.as_str()).collect();
        assert_eq!(new_files, ["c_rev1.dwg", "a_rev2.dwg", "b_rev3.dwg"]);
        for r in &records {
            let backup = backup_path(&dir.join(&r.original_file));
            assert_eq!(fs::read_to_string(backup).unwrap(), r.original_file);
        }
    }

    #[test]
    fn test_missing_file_stops_and_keeps_earlier_renames() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("first.dwg"), "first").unwrap();
        fs::write(dir.join("last.dwg"), "last").unwrap();

        let records = [
            record("first.dwg", "A"),
            record("missing.dwg", "A"),
            record("last.dwg", "A"),
        ];
        let mut mapping = Vec::new();
        let err = rename_all(&records, dir, &mut mapping).unwrap_err();

        assert!(
            matches!(&err, Error::SourceMissing { file, .. } if file == "missing.dwg"),
            "got {err}"
        );
        assert_eq!(mapping.len(), 1);
        assert!(dir.join("first_revA.dwg").exists());
        assert!(dir.join("last.dwg").exists(), "later rows untouched");
        assert!(!dir.join("last.dwg.bak").exists());
    }

    #[test]
    fn test_rename_in_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::create_dir(dir.join("sub")).unwrap();
        fs::write(dir.join("sub/part.dwg"), "part").unwrap();

        let mut mapping = Vec::new();
        rename_all(&[record("sub/part.dwg", "C")], dir, &mut mapping).unwrap();

        assert_eq!(mapping[0].new_file, "sub/part_revC.dwg");
        assert!(dir.join("sub/part_revC.dwg").exists());
        assert!(dir.join("sub/part.dwg.bak").exists());
    }
}
