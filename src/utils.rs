use crate::error::{Result, SnapshotError};
use crate::log_info;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Expands `pattern` into the snapshot files it names, in path order.
pub fn read_snapshots(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in glob::glob(pattern).map_err(SnapshotError::Pattern)? {
        let path = entry.map_err(|e| SnapshotError::Read {
            path: e.path().display().to_string(),
            message: e.error().to_string(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(SnapshotError::NoMatches(pattern.to_string()).into());
    }

    files.sort();
    log_info!("[utils] Found {} snapshot file(s) for {}", files.len(), pattern);
    Ok(files)
}

/// Opens the report sink: the given file (parents created), or stdout.
pub fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent() {
                ensure_directory(parent)?;
            }
            let file = File::create(path)?;
            log_info!("[utils] Writing report to {:?}", path);
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn lists_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("c.json")).unwrap();

        let pattern = format!("{}/*.json", dir.path().display());
        let files = read_snapshots(&pattern).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.json", "b.json"]);
    }

    #[test]
    fn no_match_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        let err = read_snapshots(&pattern).unwrap_err();
        assert!(matches!(err, AppError::Snapshot(SnapshotError::NoMatches(_))));
    }

    #[test]
    fn bad_pattern_is_an_error() {
        let err = read_snapshots("crawls/[.json").unwrap_err();
        assert!(matches!(err, AppError::Snapshot(SnapshotError::Pattern(_))));
    }

    #[test]
    fn output_file_parents_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports/nested/run.txt");

        {
            let mut out = open_output(Some(target.to_str().unwrap())).unwrap();
            writeln!(out, "*** Report ***").unwrap();
        }

        assert_eq!(fs::read_to_string(target).unwrap(), "*** Report ***\n");
    }
}
