//! Transcript snapshot files captured by the editor plugin.
//!
//! Line-oriented UTF-8:
//!
//! ```text
//! vimficiency 1
//! <filename>
//! <buffer name>
//! <row> <col>
//! <topRow> <bottomRow> <windowHeight> <scrollAmount>
//! <buffer lines...>
//! ```
//!
//! Rows and columns are 0-based. The viewport line is retained as metadata
//! only.

use core_text::Lines;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("can't read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("snapshot is empty")]
    Empty,
    #[error("bad header '{0}' (expected 'vimficiency 1')")]
    BadHeader(String),
    #[error("unsupported version {0}")]
    UnsupportedVersion(u32),
    #[error("missing {0} line")]
    MissingLine(&'static str),
    #[error("bad {what} line '{line}'")]
    BadLine { what: &'static str, line: String },
}

/// Informational viewport state at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top_row: usize,
    pub bottom_row: usize,
    pub window_height: usize,
    pub scroll_amount: usize,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub filename: String,
    pub bufname: String,
    pub row: usize,
    pub col: usize,
    pub viewport: Viewport,
    pub lines: Lines,
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_snapshot(&content)
}

pub fn parse_snapshot(content: &str) -> Result<Snapshot, SnapshotError> {
    let mut lines = content.lines();

    let header = lines.next().ok_or(SnapshotError::Empty)?;
    let mut parts = header.split_whitespace();
    let magic = parts.next().unwrap_or_default();
    let version: u32 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| SnapshotError::BadHeader(header.to_string()))?;
    if magic != "vimficiency" {
        return Err(SnapshotError::BadHeader(header.to_string()));
    }
    if version != 1 {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let filename = lines
        .next()
        .ok_or(SnapshotError::MissingLine("filename"))?
        .to_string();
    let bufname = lines
        .next()
        .ok_or(SnapshotError::MissingLine("buffer name"))?
        .to_string();

    let rowcol = lines.next().ok_or(SnapshotError::MissingLine("cursor"))?;
    let nums: Vec<usize> = rowcol
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| SnapshotError::BadLine {
            what: "cursor",
            line: rowcol.to_string(),
        })?;
    let &[row, col] = nums.as_slice() else {
        return Err(SnapshotError::BadLine {
            what: "cursor",
            line: rowcol.to_string(),
        });
    };

    let nav = lines.next().ok_or(SnapshotError::MissingLine("viewport"))?;
    let nums: Vec<usize> = nav
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| SnapshotError::BadLine {
            what: "viewport",
            line: nav.to_string(),
        })?;
    let &[top_row, bottom_row, window_height, scroll_amount] = nums.as_slice() else {
        return Err(SnapshotError::BadLine {
            what: "viewport",
            line: nav.to_string(),
        });
    };

    let buffer: Vec<String> = lines.map(str::to_string).collect();

    Ok(Snapshot {
        filename,
        bufname,
        row,
        col,
        viewport: Viewport {
            top_row,
            bottom_row,
            window_height,
            scroll_amount,
        },
        lines: Lines::new(buffer),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const GOOD: &str = "vimficiency 1\n/tmp/foo.txt\nfoo.txt\n2 5\n0 39 39 19\nline one\nline two\nline three\n";

    #[test]
    fn parses_well_formed_snapshot() {
        let snap = parse_snapshot(GOOD).unwrap();
        assert_eq!(snap.filename, "/tmp/foo.txt");
        assert_eq!(snap.bufname, "foo.txt");
        assert_eq!((snap.row, snap.col), (2, 5));
        assert_eq!(snap.viewport.window_height, 39);
        assert_eq!(snap.lines.len(), 3);
        assert_eq!(snap.lines[0], "line one");
    }

    #[test]
    fn empty_buffer_still_has_one_line() {
        let snap = parse_snapshot("vimficiency 1\nf\nb\n0 0\n0 0 0 0\n").unwrap();
        assert_eq!(snap.lines.len(), 1);
        assert_eq!(snap.lines[0], "");
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(matches!(
            parse_snapshot(""),
            Err(SnapshotError::Empty)
        ));
        assert!(matches!(
            parse_snapshot("otherformat 1\n"),
            Err(SnapshotError::BadHeader(_))
        ));
        assert!(matches!(
            parse_snapshot("vimficiency 2\nf\nb\n0 0\n0 0 0 0\n"),
            Err(SnapshotError::UnsupportedVersion(2))
        ));
        assert!(matches!(
            parse_snapshot("vimficiency one\n"),
            Err(SnapshotError::BadHeader(_))
        ));
    }

    #[test]
    fn rejects_malformed_cursor_and_viewport() {
        assert!(matches!(
            parse_snapshot("vimficiency 1\nf\nb\nx y\n0 0 0 0\n"),
            Err(SnapshotError::BadLine { what: "cursor", .. })
        ));
        assert!(matches!(
            parse_snapshot("vimficiency 1\nf\nb\n0 0\n1 2 3\n"),
            Err(SnapshotError::BadLine { what: "viewport", .. })
        ));
        assert!(matches!(
            parse_snapshot("vimficiency 1\nf\nb\n"),
            Err(SnapshotError::MissingLine("cursor"))
        ));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(GOOD.as_bytes()).unwrap();
        let snap = load_snapshot(file.path()).unwrap();
        assert_eq!(snap.lines.len(), 3);
        assert!(load_snapshot(Path::new("/definitely/not/here")).is_err());
    }
}
