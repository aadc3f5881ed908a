//! Task manifest generation and persistence
//!
//! A manifest lists the files a run operates on: one `name size` line per task,
//! preceded by a short comment header. The write phase generates and persists
//! it; a later, independent read phase loads the same manifest so both phases
//! cover an identical set of files.
//!
//! # Manifest File Format
//!
//! ```text
//! # dfsio manifest
//! # total_files=3
//! # file_size=1048576
//! # compression=none
//! test_io_0 1048576
//! test_io_1 1048576
//! test_io_2 1048576
//! ```
//!
//! The content is fully determined by the generation parameters, so
//! regenerating at the same destination yields byte-identical files.

use crate::config::CompressionCodec;
use crate::error::{BenchError, BenchResult};
use crate::fs::FileSystem;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Prefix of generated task names
pub const TASK_NAME_PREFIX: &str = "test_io_";

/// File name of the manifest inside the control directory
pub const MANIFEST_FILENAME: &str = "manifest";

const MANIFEST_TITLE: &str = "# dfsio manifest";

/// One file's worth of work
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskSpec {
    /// File name, unique within a manifest
    pub name: String,
    /// Bytes to transfer, always > 0 in a persisted manifest
    pub size_bytes: u64,
}

/// Parameters the manifest was generated with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestHeader {
    pub total_files: usize,
    pub file_size: u64,
    pub compression: Option<CompressionCodec>,
}

/// Ordered, immutable list of tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    header: ManifestHeader,
    tasks: Vec<TaskSpec>,
}

impl Manifest {
    /// Build `num_files` uniformly sized tasks named `test_io_<index>`
    pub fn generate(num_files: usize, file_size: u64, compression: Option<CompressionCodec>) -> Self {
        let tasks = (0..num_files)
            .map(|index| TaskSpec {
                name: format!("{}{}", TASK_NAME_PREFIX, index),
                size_bytes: file_size,
            })
            .collect();

        Self {
            header: ManifestHeader {
                total_files: num_files,
                file_size,
                compression,
            },
            tasks,
        }
    }

    pub fn header(&self) -> &ManifestHeader {
        &self.header
    }

    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sum of all task sizes
    pub fn total_bytes(&self) -> u64 {
        self.tasks.iter().map(|t| t.size_bytes).sum()
    }

    /// Serialize to the manifest text format
    pub fn to_text(&self) -> String {
        let mut content = String::new();

        content.push_str(MANIFEST_TITLE);
        content.push('\n');
        content.push_str(&format!("# total_files={}\n", self.header.total_files));
        content.push_str(&format!("# file_size={}\n", self.header.file_size));
        let codec = self
            .header
            .compression
            .unwrap_or(CompressionCodec::None);
        content.push_str(&format!("# compression={}\n", codec));

        for task in &self.tasks {
            content.push_str(&format!("{} {}\n", task.name, task.size_bytes));
        }

        content
    }

    /// Parse the manifest text format
    ///
    /// Rejects malformed lines, zero sizes, duplicate names, names that are not
    /// a plain file name, an empty task list and a task count that disagrees
    /// with the header.
    pub fn from_text(content: &str) -> std::result::Result<Self, String> {
        let mut total_files: Option<usize> = None;
        let mut file_size: u64 = 0;
        let mut compression = None;
        let mut tasks = Vec::new();
        let mut seen = HashSet::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix('#') {
                if let Some(val) = extract_value(comment, "total_files=") {
                    total_files = Some(
                        val.parse()
                            .map_err(|_| format!("line {}: bad total_files", lineno + 1))?,
                    );
                } else if let Some(val) = extract_value(comment, "file_size=") {
                    file_size = val
                        .parse()
                        .map_err(|_| format!("line {}: bad file_size", lineno + 1))?;
                } else if let Some(val) = extract_value(comment, "compression=") {
                    let codec: CompressionCodec = val.parse()?;
                    compression = match codec {
                        CompressionCodec::None => None,
                        other => Some(other),
                    };
                }
                continue;
            }

            let mut parts = line.split_whitespace();
            let (name, size) = match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(size), None) => (name, size),
                _ => return Err(format!("line {}: expected `name size`", lineno + 1)),
            };

            let size_bytes: u64 = size
                .parse()
                .map_err(|_| format!("line {}: bad size `{}`", lineno + 1, size))?;
            if size_bytes == 0 {
                return Err(format!("line {}: task {} has zero size", lineno + 1, name));
            }
            if !is_plain_file_name(name) {
                return Err(format!("line {}: task name {} is not a plain file name", lineno + 1, name));
            }
            if !seen.insert(name.to_string()) {
                return Err(format!("line {}: duplicate task {}", lineno + 1, name));
            }

            tasks.push(TaskSpec {
                name: name.to_string(),
                size_bytes,
            });
        }

        if tasks.is_empty() {
            return Err("manifest lists no tasks".to_string());
        }

        let total_files = total_files.unwrap_or(tasks.len());
        if total_files != tasks.len() {
            return Err(format!(
                "header announces {} files but {} tasks are listed",
                total_files,
                tasks.len()
            ));
        }

        Ok(Self {
            header: ManifestHeader {
                total_files,
                file_size,
                compression,
            },
            tasks,
        })
    }
}

/// Whether `name` is a single normal path component
///
/// Data files are joined onto the data directory, so anything that could
/// escape it (absolute paths, separators, `..`) is refused.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}

/// Extract value following `prefix` in a comment line
fn extract_value<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let pos = line.find(prefix)?;
    let after = &line[pos + prefix.len()..];
    after.split(',').next().map(str::trim)
}

/// Location of the manifest under a control directory
pub fn manifest_path(control_dir: &Path) -> PathBuf {
    control_dir.join(MANIFEST_FILENAME)
}

/// Generates, persists and loads manifests through a filesystem client
pub struct ManifestGenerator {
    fs: Arc<dyn FileSystem>,
}

impl ManifestGenerator {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Generate a manifest and persist it under `control_dir`
    ///
    /// An existing manifest is deleted first so reruns never leave stale tasks.
    pub fn generate(
        &self,
        num_files: usize,
        file_size: u64,
        compression: Option<CompressionCodec>,
        control_dir: &Path,
    ) -> BenchResult<Manifest> {
        if num_files == 0 || file_size == 0 {
            return Err(BenchError::Config(format!(
                "manifest needs at least one file of non-zero size (files={}, size={})",
                num_files, file_size
            )));
        }

        let path = manifest_path(control_dir);
        self.fs
            .remove_file(&path)
            .map_err(|e| BenchError::storage(&path, e))?;
        self.fs
            .create_dir_all(control_dir)
            .map_err(|e| BenchError::storage(control_dir, e))?;

        let manifest = Manifest::generate(num_files, file_size, compression);
        self.fs
            .write_file(&path, manifest.to_text().as_bytes())
            .map_err(|e| BenchError::storage(&path, e))?;

        info!(
            path = %path.display(),
            files = num_files,
            file_size,
            "manifest generated"
        );
        Ok(manifest)
    }

    /// Load the manifest persisted under `control_dir`
    pub fn load(&self, control_dir: &Path) -> BenchResult<Manifest> {
        let path = manifest_path(control_dir);

        let bytes = match self.fs.read_file(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BenchError::Precondition(format!(
                    "no manifest at {}; run `write` first",
                    path.display()
                )));
            }
            Err(e) => return Err(BenchError::storage(&path, e)),
        };

        let content = String::from_utf8(bytes).map_err(|_| BenchError::InvalidManifest {
            path: path.clone(),
            reason: "not valid UTF-8".into(),
        })?;

        let manifest = Manifest::from_text(&content).map_err(|reason| BenchError::InvalidManifest {
            path: path.clone(),
            reason,
        })?;

        debug!(path = %path.display(), tasks = manifest.len(), "manifest loaded");
        Ok(manifest)
    }
}
