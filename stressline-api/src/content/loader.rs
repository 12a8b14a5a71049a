//! Content table loading
//!
//! Each timeline table is one CSV with a header row and a single text
//! column of interest. Files are produced by an offline stratification
//! pipeline, so the loader tolerates whatever it finds: a table that is
//! missing, unreadable or lacks the text column degrades to an empty
//! sequence instead of failing startup. The outcome is an explicit enum so
//! the degradation is visible at the call site and in the logs, never to
//! API callers.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::ContentItem;

/// Canonical text column name.
pub const TEXT_COLUMN: &str = "text";
/// Legacy column name used by the warm-up source; renamed on load.
pub const LEGACY_TEXT_COLUMN: &str = "Sentence";

/// Result of loading one content table.
#[derive(Debug)]
pub enum TableLoad {
    Loaded {
        path: PathBuf,
        items: Vec<ContentItem>,
    },
    Degraded(LoadFailure),
}

/// Why a table degraded to an empty sequence.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("file not found")]
    NotFound,

    #[error("unreadable: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("no '{TEXT_COLUMN}' or '{LEGACY_TEXT_COLUMN}' column in header")]
    MissingTextColumn,
}

impl TableLoad {
    /// Collapse to items, logging the degraded case against `file`.
    pub fn into_items(self, file: &str) -> Vec<ContentItem> {
        match self {
            TableLoad::Loaded { path, items } => {
                info!("loaded {} items from {}", items.len(), path.display());
                items
            }
            TableLoad::Degraded(failure) => {
                warn!("content table {} degraded to empty: {}", file, failure);
                Vec::new()
            }
        }
    }
}

/// Load one content table by file name.
pub fn load_table(root: &Path, filename: &str) -> TableLoad {
    let Some(path) = locate(root, filename) else {
        return TableLoad::Degraded(LoadFailure::NotFound);
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => return TableLoad::Degraded(err.into()),
    };

    match parse_items(&content) {
        Ok(items) => TableLoad::Loaded { path, items },
        Err(failure) => TableLoad::Degraded(failure),
    }
}

/// Locate a source file: dedicated data directory first, then the root
/// folder, then the bare filename relative to the working directory.
fn locate(root: &Path, filename: &str) -> Option<PathBuf> {
    let candidates = [
        root.join("data").join(filename),
        root.join(filename),
        PathBuf::from(filename),
    ];
    candidates.into_iter().find(|p| p.exists())
}

/// Parse CSV content into items.
///
/// The header selects the text column; `Sentence` stands in for `text`
/// when the canonical name is absent. Rows with an empty text cell are
/// dropped before materializing.
fn parse_items(content: &str) -> Result<Vec<ContentItem>, LoadFailure> {
    let mut rows = parse_csv(content).into_iter();

    let header = rows.next().ok_or(LoadFailure::MissingTextColumn)?;
    let text_index = header
        .iter()
        .position(|h| h == TEXT_COLUMN)
        .or_else(|| header.iter().position(|h| h == LEGACY_TEXT_COLUMN))
        .ok_or(LoadFailure::MissingTextColumn)?;

    Ok(rows
        .filter_map(|row| {
            row.into_iter()
                .nth(text_index)
                .filter(|cell| !cell.is_empty())
        })
        .map(|text| ContentItem { text })
        .collect())
}

/// Minimal RFC 4180 reader: quoted fields may contain commas, newlines and
/// doubled-quote escapes. Good enough for the stratification pipeline's
/// output; anything unparseable simply yields fewer usable rows.
fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    // Last line without a trailing newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_data_file(dir: &TempDir, name: &str, content: &str) {
        let data = dir.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join(name), content).unwrap();
    }

    #[test]
    fn test_parse_csv_quoted_fields() {
        let rows = parse_csv("text,score\n\"hello, world\",3\n\"say \"\"hi\"\"\",4\n");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["hello, world", "3"]);
        assert_eq!(rows[2], vec!["say \"hi\"", "4"]);
    }

    #[test]
    fn test_parse_csv_quoted_newline() {
        let rows = parse_csv("text\n\"two\nlines\"\n");
        assert_eq!(rows, vec![vec!["text"], vec!["two\nlines"]]);
    }

    #[test]
    fn test_parse_csv_no_trailing_newline() {
        let rows = parse_csv("text\nlast row");
        assert_eq!(rows, vec![vec!["text"], vec!["last row"]]);
    }

    #[test]
    fn test_load_table_canonical_column() {
        let dir = TempDir::new().unwrap();
        write_data_file(&dir, "posts.csv", "id,text\n1,first\n2,second\n");

        let items = load_table(dir.path(), "posts.csv").into_items("posts.csv");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "first");
        assert_eq!(items[1].text, "second");
    }

    #[test]
    fn test_load_table_legacy_column_renamed() {
        let dir = TempDir::new().unwrap();
        write_data_file(&dir, "warmup.csv", "Sentence,label\nおはよう,0\n");

        let items = load_table(dir.path(), "warmup.csv").into_items("warmup.csv");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "おはよう");
    }

    #[test]
    fn test_load_table_drops_empty_text_cells() {
        let dir = TempDir::new().unwrap();
        write_data_file(&dir, "posts.csv", "text\nkeep\n\nalso keep\n");

        let items = load_table(dir.path(), "posts.csv").into_items("posts.csv");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_load_table_missing_file_degrades() {
        let dir = TempDir::new().unwrap();

        let load = load_table(dir.path(), "nope.csv");
        assert!(matches!(load, TableLoad::Degraded(LoadFailure::NotFound)));
        assert!(load.into_items("nope.csv").is_empty());
    }

    #[test]
    fn test_load_table_missing_text_column_degrades() {
        let dir = TempDir::new().unwrap();
        write_data_file(&dir, "bad.csv", "id,label\n1,2\n");

        let load = load_table(dir.path(), "bad.csv");
        assert!(matches!(
            load,
            TableLoad::Degraded(LoadFailure::MissingTextColumn)
        ));
    }

    #[test]
    fn test_root_level_file_found_after_data_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("posts.csv"), "text\nroot level\n").unwrap();

        let items = load_table(dir.path(), "posts.csv").into_items("posts.csv");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "root level");
    }
}
