//! Item list ingestion from uploaded `.csv` / `.txt` files.
//!
//! Every function returns names that are already trimmed and non-empty, ready
//! for `add_items`.

use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid file type for {0}; please upload a .csv or .txt file")]
    UnsupportedExtension(String),
    #[error("no valid items found in the file")]
    NoItems,
}

/// One item per non-blank line.
pub fn items_from_txt(content: &str) -> Vec<String> {
    content.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect()
}

/// First column of each non-empty record. Double-quoted fields may contain
/// commas, escaped quotes (`""`) and line breaks.
pub fn items_from_csv(content: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut field = String::new();
    let mut column = 0usize;
    let mut quoted = false;
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                chars.next();
                if column == 0 {
                    field.push('"');
                }
            }
            '"' => quoted = !quoted,
            ',' if !quoted => column += 1,
            '\n' if !quoted => {
                push_item(&mut items, &mut field);
                column = 0;
            }
            '\r' if !quoted => {}
            c if column == 0 => field.push(c),
            _ => {}
        }
    }
    push_item(&mut items, &mut field);
    items
}

fn push_item(items: &mut Vec<String>, field: &mut String) {
    let name = field.trim();
    if !name.is_empty() {
        items.push(name.to_string());
    }
    field.clear();
}

/// Parses `content` according to the extension of `file_name`.
pub fn items_from_upload(file_name: &str, content: &str) -> Result<Vec<String>, IngestError> {
    let lower = file_name.to_ascii_lowercase();
    let items = if lower.ends_with(".csv") {
        items_from_csv(content)
    } else if lower.ends_with(".txt") {
        items_from_txt(content)
    } else {
        return Err(IngestError::UnsupportedExtension(file_name.to_string()));
    };
    if items.is_empty() {
        return Err(IngestError::NoItems);
    }
    Ok(items)
}

pub fn items_from_file(path: &Path) -> Result<Vec<String>, IngestError> {
    let name = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|source| IngestError::Io { path: name.clone(), source })?;
    items_from_upload(&name, &content)
}
