use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A directory entry, named by its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
}

/// Immediate children of one archive directory.
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    /// The node's own descriptor file, if present.
    pub descriptor: Option<PathBuf>,
    pub dirs: Vec<Entry>,
    pub files: Vec<Entry>,
}

/// List the immediate children of `dir`, sorted by file name.
/// The entry named `descriptor_name` is split out; hidden entries are skipped.
/// Entry contents are never opened.
pub fn scan_directory(dir: &Path, descriptor_name: &str) -> Result<DirListing> {
    if !dir.is_dir() {
        let reason = if dir.exists() {
            "not a directory"
        } else {
            "path does not exist"
        };
        return Err(Error::DirectoryUnreadable {
            path: dir.to_path_buf(),
            reason: reason.to_string(),
        });
    }

    let mut listing = DirListing::default();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::DirectoryUnreadable {
            path: e.path().unwrap_or(dir).to_path_buf(),
            reason: e.to_string(),
        })?;

        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| Error::UnexpectedEntry(entry.path().to_path_buf()))?
            .to_string();
        if is_hidden(&name) {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_file() && name == descriptor_name {
            listing.descriptor = Some(entry.into_path());
        } else if file_type.is_dir() {
            listing.dirs.push(Entry {
                name,
                path: entry.into_path(),
            });
        } else if file_type.is_file() {
            listing.files.push(Entry {
                name,
                path: entry.into_path(),
            });
        } else {
            return Err(Error::UnexpectedEntry(entry.into_path()));
        }
    }

    Ok(listing)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_scan_partitions_descriptor_dirs_and_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("location_data.json"), b"{}").unwrap();
        fs::write(tmp.path().join("b.jpg"), b"b").unwrap();
        fs::write(tmp.path().join("a.jpg"), b"a").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let listing = scan_directory(tmp.path(), "location_data.json").unwrap();
        assert_eq!(
            listing.descriptor,
            Some(tmp.path().join("location_data.json"))
        );
        assert_eq!(names(&listing.files), vec!["a.jpg", "b.jpg"]);
        assert_eq!(names(&listing.dirs), vec!["sub"]);
    }

    #[test]
    fn test_scan_sorted_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "mid", "Beta"] {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }

        let listing = scan_directory(tmp.path(), "trip_data.json").unwrap();
        assert_eq!(names(&listing.dirs), vec!["Beta", "alpha", "mid", "zeta"]);
        assert!(listing.descriptor.is_none());
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".DS_Store"), b"x").unwrap();
        fs::create_dir(tmp.path().join(".thumbnails")).unwrap();
        fs::write(tmp.path().join("photo.jpg"), b"x").unwrap();

        let listing = scan_directory(tmp.path(), "location_data.json").unwrap();
        assert_eq!(names(&listing.files), vec!["photo.jpg"]);
        assert!(listing.dirs.is_empty());
    }

    #[test]
    fn test_scan_descriptor_named_directory_is_content() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("trip_data.json")).unwrap();

        let listing = scan_directory(tmp.path(), "trip_data.json").unwrap();
        assert!(listing.descriptor.is_none());
        assert_eq!(names(&listing.dirs), vec!["trip_data.json"]);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let err = scan_directory(Path::new("/nonexistent/archive"), "trip_data.json").unwrap_err();
        assert!(matches!(err, Error::DirectoryUnreadable { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_scan_file_is_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, b"x").unwrap();

        let err = scan_directory(&file, "trip_data.json").unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_scan_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let listing = scan_directory(tmp.path(), "trip_data.json").unwrap();
        assert!(listing.descriptor.is_none());
        assert!(listing.dirs.is_empty());
        assert!(listing.files.is_empty());
    }
}
