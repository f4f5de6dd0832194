use serde::Serialize;

use crate::config::check_window;
use crate::error::Result;

/// A window of the source document. Offsets count characters, not bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }
}

/// Splits `text` into windows of `size` characters, each starting `size - overlap`
/// characters after the previous one. The last window may be shorter.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    check_window("chunk", size, overlap)?;

    let chars: Vec<char> = text.chars().collect();
    let len_chars = chars.len();
    let step = size - overlap;

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < len_chars {
        let end = (start + size).min(len_chars);
        chunks.push(Chunk {
            index: chunks.len(),
            text: chars[start..end].iter().collect(),
            start_offset: start,
            end_offset: end,
        });
        if end == len_chars {
            break;
        }
        start += step;
    }

    Ok(chunks)
}

pub fn chunk_texts(chunks: &[Chunk]) -> Vec<String> {
    chunks.iter().map(|c| c.text.clone()).collect()
}
