//! Bundle file scanning and validation

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use intake_types::{Error, Result};

/// Extensions read as annotation bundles
const BUNDLE_EXTENSIONS: &[&str] = &["json"];

/// Check if a path looks like an annotation bundle file
pub fn is_bundle_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| BUNDLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validate that a bundle file exists and is a regular file
pub fn validate_bundle(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(Error::Scan(format!("{} is not a file", path.display())));
    }

    Ok(())
}

/// Scan a directory recursively for bundle files, sorted by path
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    if !dir.is_dir() {
        return Err(Error::Scan(format!("{} is not a directory", dir.display())));
    }

    let mut bundles: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_bundle_file(path))
        .collect();

    bundles.sort();
    Ok(bundles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_is_bundle_file() {
        assert!(is_bundle_file(Path::new("scene.json")));
        assert!(is_bundle_file(Path::new("SCENE.JSON")));
        assert!(!is_bundle_file(Path::new("scene.jpg")));
        assert!(!is_bundle_file(Path::new("scene")));
    }

    #[test]
    fn test_scan_directory_recurses_and_sorts() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("sub").join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let found = scan_directory(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("b.json"), dir.path().join("sub").join("a.json")]
        );
    }

    #[test]
    fn test_scan_rejects_file_and_missing_dir() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("x.json");
        fs::write(&file, "{}").unwrap();
        assert!(matches!(scan_directory(&file), Err(Error::Scan(_))));
        assert!(matches!(
            scan_directory(&dir.path().join("missing")),
            Err(Error::FileNotFound(_))
        ));
        assert!(validate_bundle(&file).is_ok());
        assert!(matches!(validate_bundle(dir.path()), Err(Error::Scan(_))));
    }
}
