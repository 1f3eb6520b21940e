//! Glob-based workspace file matcher.

use crate::error::{FileSystemError, FileSystemResult};
use glob::{MatchOptions, Pattern};
use std::path::Path;
use walkdir::WalkDir;

/// Directory names pruned from every workspace walk.
///
/// These cover version control metadata and the build output directories of
/// the ecosystems forge orchestrates; additional names can be appended with
/// [`FileMatcher::with_excluded_dirs`].
pub const DEFAULT_EXCLUDED_DIRS: [&str; 5] = [".git", "node_modules", "target", "build", "dist"];

/// Resolves glob patterns against a workspace tree.
///
/// Matching is case-sensitive (on case-sensitive filesystems), `*` never
/// crosses a path separator, and only regular files are returned — symlinks
/// are not followed, so nothing outside the workspace root can leak into the
/// result set.
///
/// # Examples
///
/// ```no_run
/// use forge_standard_tools::filesystem::FileMatcher;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let matcher = FileMatcher::new().with_excluded_dirs(["coverage"]);
/// let files = matcher.match_files(Path::new("/repo"), "**/package.json")?;
/// for file in files {
///     println!("{file}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileMatcher {
    /// Directory names skipped during traversal
    excluded_dirs: Vec<String>,
}

impl FileMatcher {
    /// Creates a matcher with the default excluded directories.
    #[must_use]
    pub fn new() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Appends additional directory names to exclude from traversal.
    #[must_use]
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Returns the directory names excluded from traversal.
    pub fn excluded_dirs(&self) -> &[String] {
        &self.excluded_dirs
    }

    /// Resolves `pattern` against the tree rooted at `root`.
    ///
    /// Returns the workspace-relative paths (forward-slash separated, sorted)
    /// of the regular files whose relativized path matches the glob. I/O
    /// errors on individual directories are logged and suppressed; the walk
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a directory or if `pattern` fails to
    /// compile.
    pub fn match_files(&self, root: &Path, pattern: &str) -> FileSystemResult<Vec<String>> {
        if !root.is_dir() {
            return Err(FileSystemError::NotADirectory { path: root.to_path_buf() });
        }

        let compiled = Self::compile(pattern)?;
        // `**/` in the glob crate requires at least the separator, so a
        // pattern like `**/package.json` would miss a root-level manifest.
        // Matching the suffix pattern alongside covers that case.
        let root_level = match pattern.strip_prefix("**/") {
            Some(suffix) => Some(Self::compile(suffix)?),
            None => None,
        };

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let mut matches = Vec::new();
        let walker = WalkDir::new(root).follow_links(false).into_iter().filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            // Never prune the root itself, even if the workspace lives in a
            // directory named like a build output (e.g. `build/`).
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !self.excluded_dirs.iter().any(|excluded| excluded.as_str() == name)
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    log::warn!("Skipping unreadable workspace entry: {error}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let relative = Self::to_relative_string(relative);

            let matched = compiled.matches_with(&relative, options)
                || root_level.as_ref().is_some_and(|p| p.matches_with(&relative, options));
            if matched {
                matches.push(relative);
            }
        }

        matches.sort();
        Ok(matches)
    }

    /// Compiles a glob pattern, mapping failures into [`FileSystemError`].
    fn compile(pattern: &str) -> FileSystemResult<Pattern> {
        Pattern::new(pattern).map_err(|error| FileSystemError::InvalidPattern {
            pattern: pattern.to_string(),
            message: error.to_string(),
        })
    }

    /// Renders a relative path with forward slashes on every platform.
    fn to_relative_string(path: &Path) -> String {
        let rendered = path.to_string_lossy();
        if std::path::MAIN_SEPARATOR == '/' {
            rendered.into_owned()
        } else {
            rendered.replace(std::path::MAIN_SEPARATOR, "/")
        }
    }
}

impl Default for FileMatcher {
    fn default() -> Self {
        Self::new()
    }
}
