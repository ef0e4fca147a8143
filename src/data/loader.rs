// ============================================================
// Layer 4 - Corpus Loader
// ============================================================
// Reads the labelled URL corpus from a CSV file.
//
// Expected shape (extra columns are ignored):
//
//   url,type
//   http://example.com/,benign
//   http://victim.org/index.php?option=com_content,defacement
//
// The file is decoded as ISO-8859-1 before parsing: every byte
// becomes the code point of the same value (0x80 → U+0080), so
// stray high bytes never abort the load.
//
// Two failure classes:
//   - The file cannot be read, or the header lacks `url`/`type`
//     → fatal error, nothing downstream runs
//   - A single row is malformed (wrong field count, empty url,
//     unknown type) → the row is skipped and counted

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::labeled_url::{Label, LabeledUrl};
use crate::domain::traits::CorpusSource;

/// Loads labelled URLs from a CSV file on disk.
pub struct CsvCorpusLoader {
    path: PathBuf,
}

impl CsvCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for CsvCorpusLoader {
    fn load_all(&self) -> Result<Vec<LabeledUrl>> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Cannot read corpus '{}'", self.path.display()))?;

        let text = encoding_rs::mem::decode_latin1(&bytes);

        let parsed = parse_corpus(&text)
            .with_context(|| format!("Cannot parse corpus '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} rows from '{}' ({} malformed rows skipped)",
            parsed.rows.len(),
            self.path.display(),
            parsed.skipped,
        );
        Ok(parsed.rows)
    }
}

/// Result of parsing a corpus: the usable rows and how many
/// were thrown away.
#[derive(Debug, Default)]
pub struct ParsedCorpus {
    pub rows:    Vec<LabeledUrl>,
    pub skipped: usize,
}

/// Parse CSV text into labelled rows.
///
/// Fails only when the header is unreadable or missing one of
/// the required columns.
pub fn parse_corpus(text: &str) -> Result<ParsedCorpus> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("Cannot read CSV header")?.clone();
    let url_col  = column_index(&headers, "url");
    let type_col = column_index(&headers, "type");
    let (url_col, type_col) = match (url_col, type_col) {
        (Some(u), Some(t)) => (u, t),
        _ => bail!("CSV header must contain 'url' and 'type' columns, found: {:?}", headers),
    };

    let mut parsed = ParsedCorpus::default();

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r)  => r,
            Err(e) => {
                tracing::debug!("Skipping row {}: {}", line + 2, e);
                parsed.skipped += 1;
                continue;
            }
        };

        let url   = record.get(url_col).unwrap_or("");
        let label = record.get(type_col).and_then(Label::from_type);

        match label {
            Some(label) if !url.is_empty() => {
                parsed.rows.push(LabeledUrl::new(url, label));
            }
            _ => {
                tracing::debug!("Skipping row {}: missing url or unknown type", line + 2);
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
}
