use std::fmt;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{RagError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Csv,
    Json,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 5] = [
        DocumentFormat::Pdf,
        DocumentFormat::Docx,
        DocumentFormat::Txt,
        DocumentFormat::Csv,
        DocumentFormat::Json,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
            DocumentFormat::Csv => "csv",
            DocumentFormat::Json => "json",
        }
    }

    pub fn from_extension(ext: &str) -> Result<Self> {
        let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == normalized)
            .ok_or_else(|| RagError::UnsupportedFormat(ext.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| RagError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }
}

impl FromStr for DocumentFormat {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::Txt => String::from_utf8(bytes.to_vec())
            .map_err(|e| RagError::extraction("txt", e))?,
        DocumentFormat::Csv => {
            let raw = std::str::from_utf8(bytes).map_err(|e| RagError::extraction("csv", e))?;
            render_table(&parse_csv(raw))
        }
        DocumentFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_slice(bytes).map_err(|e| RagError::extraction("json", e))?;
            serde_json::to_string_pretty(&value).map_err(|e| RagError::extraction("json", e))?
        }
    };
    debug!(%format, bytes = bytes.len(), chars = text.chars().count(), "extracted text");
    Ok(text)
}

pub fn extract_file(path: &Path, max_bytes: u64) -> Result<String> {
    let format = DocumentFormat::from_path(path)?;
    let size = fs::metadata(path)
        .map_err(|e| RagError::extraction(format.extension(), e))?
        .len();
    if size > max_bytes {
        return Err(RagError::extraction(
            format.extension(),
            format!("{} is {} bytes, limit is {}", path.display(), size, max_bytes),
        ));
    }
    let bytes = fs::read(path).map_err(|e| RagError::extraction(format.extension(), e))?;
    extract_text(&bytes, format)
}

/// First `chars` characters of `text`, marked when cut.
pub fn preview(text: &str, chars: usize) -> String {
    match text.char_indices().nth(chars) {
        Some((byte_idx, _)) => format!("{}\n…", &text[..byte_idx]),
        None => text.to_string(),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| RagError::extraction("pdf", e))?;
    let mut pages = Vec::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) => pages.push(text),
            Err(e) => warn!(page = page_num, error = %e, "failed to extract pdf page, skipping"),
        }
    }
    Ok(pages.join("\n"))
}

fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| RagError::extraction("docx", e))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| RagError::extraction("docx", e))?
        .read_to_string(&mut xml)
        .map_err(|e| RagError::extraction("docx", e))?;
    Ok(docx_paragraphs(&xml).join("\n"))
}

fn docx_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:br/>").expect("valid docx run pattern")
    })
}

fn docx_paragraphs(xml: &str) -> Vec<String> {
    let runs = docx_run_pattern();
    let body = xml.split("</w:body>").next().unwrap_or(xml);
    let mut paragraphs: Vec<String> = body
        .split("</w:p>")
        .map(|para| {
            let mut line = String::new();
            for cap in runs.captures_iter(para) {
                match cap.get(1) {
                    Some(text) => line.push_str(&decode_entities(text.as_str())),
                    None if &cap[0] == "<w:tab/>" => line.push('\t'),
                    None => line.push('\n'),
                }
            }
            line
        })
        .collect();
    // The segment after the last closing tag holds no paragraph.
    if paragraphs.last().is_some_and(|p| p.is_empty()) {
        paragraphs.pop();
    }
    paragraphs
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn parse_csv(raw: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => row.push(std::mem::take(&mut field)),
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows.retain(|r| !(r.len() == 1 && r[0].trim().is_empty()));
    rows
}

/// Right-aligned columns separated by a space, header first, no row index.
fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            (0..columns)
                .map(|i| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{:>width$}", cell, width = widths[i])
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_honors_quotes_and_escaped_quotes() {
        let rows = parse_csv("name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\r\n");
        assert_eq!(
            rows,
            vec![
                vec!["name".to_string(), "note".to_string()],
                vec!["Smith, J".to_string(), "said \"hi\"".to_string()],
            ]
        );
    }

    #[test]
    fn table_pads_short_rows() {
        let rows = vec![
            vec!["a".to_string(), "bb".to_string()],
            vec!["ccc".to_string()],
        ];
        assert_eq!(render_table(&rows), "  a bb\nccc   ");
    }

    #[test]
    fn docx_paragraphs_decode_runs_and_entities() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>Fish &amp; chips</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve"> daily</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;
        assert_eq!(docx_paragraphs(xml), vec!["Fish & chips\t daily", "Second"]);
    }
}
