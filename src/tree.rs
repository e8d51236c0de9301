//! Recursive directory listing with box-drawing connectors.

use crate::style::{Color, Style};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const BRANCH: &str = "├──";
const LAST_BRANCH: &str = "└──";
const PIPE_INDENT: &str = "│  ";
const BLANK_INDENT: &str = "   ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    /// Symlinks, sockets, devices and anything whose type can't be read.
    Other,
}

#[derive(Debug)]
struct Entry {
    name: String,
    path: PathBuf,
    kind: EntryKind,
}

impl Entry {
    fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Renders a directory and, up to `max_depth` levels below it, its subdirectories.
///
/// Depth 0 is the directory passed to [`TreeRenderer::render`]; a subdirectory found
/// at depth `d` is entered only while `d + 1 <= max_depth`.
pub(crate) struct TreeRenderer {
    style: Style,
    max_depth: usize,
}

impl TreeRenderer {
    pub(crate) fn new(style: Style, max_depth: usize) -> Self {
        Self { style, max_depth }
    }

    /// Print `root` followed by its entries.
    ///
    /// Fails if `root` itself can't be read or `out` can't be written. Subdirectories
    /// that can't be opened are reported on stderr and skipped.
    pub(crate) fn render(&self, root: &Path, out: &mut dyn Write) -> Result<()> {
        let entries = read_entries(root)
            .with_context(|| format!("tree: cannot open '{}'", root.display()))?;
        writeln!(out, "{}", self.style.paint(Color::Blue, root.display().to_string()))?;
        self.render_entries(entries, "", 0, out)?;
        Ok(())
    }

    fn walk(&self, dir: &Path, prefix: &str, depth: usize, out: &mut dyn Write) -> io::Result<()> {
        if depth > self.max_depth {
            return Ok(());
        }
        let entries = match read_entries(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("tree: cannot open {}: {}", dir.display(), e);
                eprintln!("microshell: tree: cannot open '{}': {}", dir.display(), e);
                return Ok(());
            }
        };
        self.render_entries(entries, prefix, depth, out)
    }

    fn render_entries(
        &self,
        entries: Vec<Entry>,
        prefix: &str,
        depth: usize,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        // Only directories and regular files decide which sibling is last; other
        // kinds are still printed, so a trailing symlink gets a non-last connector.
        let counted = entries
            .iter()
            .filter(|e| e.kind != EntryKind::Other)
            .count();
        debug!("tree: depth {depth}, {} entries, {counted} counted", entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let is_last = position + 1 == counted;
            let connector = if is_last { LAST_BRANCH } else { BRANCH };
            writeln!(out, "{prefix}{connector} {}", self.entry_label(entry))?;

            if entry.kind == EntryKind::Dir {
                let indent = if is_last { BLANK_INDENT } else { PIPE_INDENT };
                let child_prefix = format!("{prefix}{indent}");
                self.walk(&entry.path, &child_prefix, depth + 1, out)?;
            }
        }
        Ok(())
    }

    fn entry_label(&self, entry: &Entry) -> String {
        let name = match entry.kind {
            EntryKind::Dir => format!("{}/", entry.name),
            _ => entry.name.clone(),
        };
        if entry.is_hidden() {
            self.style.paint(Color::Dim, name)
        } else if entry.kind == EntryKind::Dir {
            self.style.paint(Color::Blue, name)
        } else {
            name
        }
    }
}

/// Entries of `dir` sorted by name. `read_dir` never yields `.` or `..`.
fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for dirent in fs::read_dir(dir)? {
        let dirent = dirent?;
        let kind = match dirent.file_type() {
            Ok(t) if t.is_dir() => EntryKind::Dir,
            Ok(t) if t.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        };
        entries.push(Entry {
            name: dirent.file_name().to_string_lossy().into_owned(),
            path: dirent.path(),
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_unique_temp_dir;
    use std::fs::File;

    fn render(root: &Path, max_depth: usize) -> Vec<String> {
        let mut out = Vec::new();
        TreeRenderer::new(Style::plain(), max_depth)
            .render(root, &mut out)
            .expect("render");
        String::from_utf8(out)
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    /// root/{.hidden, a.txt, b/{c/{d.txt}, inner.txt}}
    fn sample_tree(tag: &str) -> PathBuf {
        let root = make_unique_temp_dir(&format!("tree_{tag}"));
        File::create(root.join("a.txt")).unwrap();
        File::create(root.join(".hidden")).unwrap();
        fs::create_dir_all(root.join("b").join("c")).unwrap();
        File::create(root.join("b").join("inner.txt")).unwrap();
        File::create(root.join("b").join("c").join("d.txt")).unwrap();
        root
    }

    #[test]
    fn top_level_only_without_recursion() {
        let root = sample_tree("flat");
        let lines = render(&root, 0);
        assert_eq!(lines, vec!["├── .hidden", "├── a.txt", "└── b/"]);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn recursion_descends_with_prefixes() {
        let root = sample_tree("deep");
        let lines = render(&root, 5);
        assert_eq!(
            lines,
            vec![
                "├── .hidden",
                "├── a.txt",
                "└── b/",
                "   ├── c/",
                "   │  └── d.txt",
                "   └── inner.txt",
            ]
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn depth_bound_stops_descent() {
        let root = sample_tree("bound");
        let lines = render(&root, 1);
        assert_eq!(
            lines,
            vec![
                "├── .hidden",
                "├── a.txt",
                "└── b/",
                "   ├── c/",
                "   └── inner.txt",
            ]
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn empty_directory_prints_only_root() {
        let root = make_unique_temp_dir("tree_empty");
        let mut out = Vec::new();
        TreeRenderer::new(Style::plain(), 5)
            .render(&root, &mut out)
            .unwrap();
        let s = String::from_utf8(out).unwrap();
        assert_eq!(s, format!("{}\n", root.display()));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = std::env::temp_dir().join(format!("microshell_tree_missing_{}", std::process::id()));
        let mut out = Vec::new();
        let res = TreeRenderer::new(Style::plain(), 0).render(&root, &mut out);
        assert!(res.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn hidden_entries_are_styled_differently() {
        let root = sample_tree("styled");
        let mut out = Vec::new();
        TreeRenderer::new(Style::colored(), 0)
            .render(&root, &mut out)
            .unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("├── \x1b[2m.hidden\x1b[0m"));
        assert!(s.contains("├── a.txt\n"));
        assert!(s.contains("└── \x1b[0;34mb/\x1b[0m"));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    #[cfg(unix)]
    fn trailing_symlink_is_not_counted_as_last() {
        let root = make_unique_temp_dir("tree_symlink");
        File::create(root.join("a.txt")).unwrap();
        std::os::unix::fs::symlink(root.join("a.txt"), root.join("z-link")).unwrap();
        let lines = render(&root, 0);
        assert_eq!(lines, vec!["└── a.txt", "├── z-link"]);
        let _ = fs::remove_dir_all(root);
    }
}
