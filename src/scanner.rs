use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File names accepted as application descriptors
pub const DESCRIPTOR_FILE_NAMES: [&str; 3] = ["application.yaml", "application.yml", "application.json"];

/// Scanner for application project directories.
///
/// The `ProjectScanner` recursively walks a project directory to find the application
/// descriptor and every `.properties` message catalog. It skips the `target` directory and
/// hidden directories (those starting with `.`).
///
/// # Example
///
/// ```no_run
/// use openapi_from_pages::scanner::ProjectScanner;
/// use std::path::PathBuf;
///
/// let scanner = ProjectScanner::new(PathBuf::from("./my-app"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} catalogs", result.catalogs.len());
/// ```
pub struct ProjectScanner {
    root_path: PathBuf,
}

/// Result of a project scan.
pub struct ScanResult {
    /// Application descriptors, shallowest first
    pub descriptors: Vec<PathBuf>,
    /// `.properties` files, in path order
    pub catalogs: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl ScanResult {
    /// The descriptor closest to the project root
    pub fn descriptor(&self) -> Option<&Path> {
        self.descriptors.first().map(PathBuf::as_path)
    }
}

impl ProjectScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree for descriptors and message catalogs.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning continues.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut descriptors = Vec::new();
        let mut catalogs = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";

                !is_hidden && !is_target
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if !path.is_file() {
                        continue;
                    }
                    let file_name = entry.file_name().to_string_lossy();
                    if DESCRIPTOR_FILE_NAMES.contains(&file_name.as_ref()) {
                        descriptors.push((entry.depth(), path.to_path_buf()));
                    } else if path.extension().and_then(|s| s.to_str()) == Some("properties") {
                        catalogs.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        descriptors.sort_by_key(|(depth, _)| *depth);

        Ok(ScanResult {
            descriptors: descriptors.into_iter().map(|(_, path)| path).collect(),
            catalogs,
            warnings,
        })
    }
}
