//! Result file scanner - finds `encapp_*.json` files below a search root

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Check whether a file name looks like an encapp result file
pub fn is_result_file_name(name: &str) -> bool {
    regex!(r"^encapp_.*\.json$").is_match(name)
}

/// Scan options
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Follow directory symlinks (loops are detected and skipped)
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_links: true,
        }
    }
}

/// Find result files below `root` using the default options
pub fn scan_dir<P: AsRef<Path>>(root: P, recursive: bool) -> Vec<PathBuf> {
    let options = ScanOptions {
        recursive,
        ..Default::default()
    };
    scan_dir_with_options(root, &options)
}

/// Find result files below `root`, in directory listing order.
///
/// Unreadable entries and symlink loops are logged and skipped.
pub fn scan_dir_with_options<P: AsRef<Path>>(root: P, options: &ScanOptions) -> Vec<PathBuf> {
    let root = root.as_ref();
    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(options.follow_links)
        .max_depth(max_depth)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping entry below {:?}: {}", root, e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matched = entry
            .file_name()
            .to_str()
            .is_some_and(is_result_file_name);
        if matched {
            tracing::trace!("Found result file {:?}", entry.path());
            files.push(entry.into_path());
        }
    }

    tracing::debug!(
        "Scanned {:?} (recursive={}): {} result files",
        root,
        options.recursive,
        files.len()
    );
    files
}
