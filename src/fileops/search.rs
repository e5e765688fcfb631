#![forbid(unsafe_code)]

use std::ffi::OsStr;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Traversal knobs.  The defaults reproduce an unsorted walk that doesn't
/// follow symlinked directories.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Visit each directory's entries in name order, making results repeatable.
    pub sort_entries: bool,
    /// Descend into symlinked directories.  Link cycles are reported by the
    /// walk as errors and skipped like any other unreadable entry.
    pub follow_links: bool,
}

/// Finds the first file with a given name beneath a root directory.
///
/// The walk is depth first and pre-order: each subdirectory is fully searched
/// before the next sibling entry is looked at, and the first match ends the
/// walk.  Without `sort_entries` the order, and so which of several equally
/// named files is found, depends on the filesystem.
///
/// Directories that can't be listed are logged and treated as empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectorySearcher {
    options: SearchOptions,
}

impl DirectorySearcher {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// Return the path of the first regular file under `root` whose base name
    /// is exactly `filename`, or None if there is no such file.
    pub fn search(&self, root: &Path, filename: &str) -> Option<PathBuf> {
        if filename.is_empty() {
            return None;
        }

        // The root itself is never a candidate, only what lies beneath it.
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.options.follow_links);
        if self.options.sort_entries {
            walker = walker.sort_by_file_name();
        }

        let found = first_match(walker.into_iter(), OsStr::new(filename));
        if let Some(path) = &found {
            debug!("Found {} at {}", filename, path.display());
        }
        found
    }
}

// ---------------------------------------------------------------------------
// first_match:
// ---------------------------------------------------------------------------
/** Consume walk results until a file named `target` turns up.  Errors, such
 * as a directory that can't be read or a link cycle, are logged and the walk
 * carries on with whatever is still reachable.
 */
fn first_match<E, I>(entries: I, target: &OsStr) -> Option<PathBuf>
where
    E: Display,
    I: Iterator<Item = Result<DirEntry, E>>,
{
    entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("Skipping unreadable entry during search: {}", e);
                None
            }
        })
        .find(|e| e.file_name() == target && is_file(e))
        .map(DirEntry::into_path)
}

// Links to regular files count as files even when links aren't followed.
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap();
    }

    fn search(root: &Path, filename: &str) -> Option<PathBuf> {
        DirectorySearcher::default().search(root, filename)
    }

    fn sorted() -> DirectorySearcher {
        DirectorySearcher::new(SearchOptions { sort_entries: true, ..Default::default() })
    }

    #[test]
    fn finds_file_in_root() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("target.txt"));
        touch(&root.path().join("other.txt"));

        assert_eq!(search(root.path(), "target.txt"), Some(root.path().join("target.txt")));
    }

    #[test]
    fn missing_file_is_absent() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("a/one.txt"));
        touch(&root.path().join("b/two.txt"));

        assert_eq!(search(root.path(), "missing.txt"), None);
    }

    #[test]
    fn finds_nested_file() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("a/b/target.txt"));

        assert_eq!(search(root.path(), "target.txt"), Some(root.path().join("a/b/target.txt")));
    }

    #[test]
    fn duplicates_yield_exactly_one() {
        let root = tempfile::tempdir().unwrap();
        let shallow = root.path().join("target.txt");
        let deep = root.path().join("sub/deeper/target.txt");
        touch(&shallow);
        touch(&deep);

        let found = search(root.path(), "target.txt").unwrap();
        assert!(found == shallow || found == deep);
    }

    #[test]
    fn sorted_walk_descends_before_later_siblings() {
        // "sub" sorts before "target.txt", so the nested copy is reached first.
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("target.txt"));
        touch(&root.path().join("sub/target.txt"));

        assert_eq!(sorted().search(root.path(), "target.txt"),
                   Some(root.path().join("sub/target.txt")));
    }

    #[test]
    fn walk_errors_do_not_stop_the_search() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("b/target.txt"));

        // A failed subtree ahead of the sibling that holds the match.
        let real = WalkDir::new(root.path()).min_depth(1).sort_by_file_name().into_iter()
            .map(|r| r.map_err(|e| e.to_string()));
        let entries = std::iter::once(Err("a: permission denied".to_string())).chain(real);

        assert_eq!(first_match(entries, OsStr::new("target.txt")),
                   Some(root.path().join("b/target.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subtree_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let denied = root.path().join("a");
        touch(&denied.join("target.txt"));
        touch(&root.path().join("b/target.txt"));
        fs::set_permissions(&denied, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits don't bind a privileged user; the walk_errors test
        // covers the same recovery path there.
        let locked = fs::read_dir(&denied).is_err();
        let found = sorted().search(root.path(), "target.txt");
        fs::set_permissions(&denied, fs::Permissions::from_mode(0o755)).unwrap();
        if !locked {
            return;
        }

        assert_eq!(found, Some(root.path().join("b/target.txt")));
    }

    #[test]
    fn missing_root_is_absent() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(search(&root.path().join("nope"), "target.txt"), None);
    }

    #[test]
    fn root_itself_never_matches() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("target.txt");
        touch(&file);
        assert_eq!(search(&file, "target.txt"), None);
    }

    #[test]
    fn empty_directory_is_absent() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(search(root.path(), "target.txt"), None);
    }

    #[test]
    fn directories_never_match() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("target.txt")).unwrap();
        assert_eq!(search(root.path(), "target.txt"), None);
    }

    #[test]
    fn match_is_exact() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("Target.txt"));
        touch(&root.path().join("target.txt.bak"));
        assert_eq!(search(root.path(), "target.txt"), None);
        assert_eq!(search(root.path(), ""), None);
    }

    #[cfg(unix)]
    #[test]
    fn linked_directories_are_not_followed_by_default() {
        let outside = tempfile::tempdir().unwrap();
        touch(&outside.path().join("target.txt"));
        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("link")).unwrap();

        assert_eq!(search(root.path(), "target.txt"), None);

        let searcher = DirectorySearcher::new(SearchOptions { follow_links: true, ..Default::default() });
        assert_eq!(searcher.search(root.path(), "target.txt"),
                   Some(root.path().join("link/target.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn link_cycle_terminates() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("a/b/target.txt"));
        std::os::unix::fs::symlink(root.path(), root.path().join("a/back")).unwrap();

        let searcher = DirectorySearcher::new(SearchOptions { follow_links: true, sort_entries: true });
        assert_eq!(searcher.search(root.path(), "missing.txt"), None);
        assert_eq!(searcher.search(root.path(), "target.txt"),
                   Some(root.path().join("a/b/target.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn linked_file_counts_as_file() {
        let outside = tempfile::tempdir().unwrap();
        touch(&outside.path().join("real.txt"));
        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.txt"), root.path().join("target.txt")).unwrap();

        assert_eq!(search(root.path(), "target.txt"), Some(root.path().join("target.txt")));
    }
}
