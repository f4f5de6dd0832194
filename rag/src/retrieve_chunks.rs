use tracing::debug;

use crate::chunk_text::Chunk;
use crate::embed_chunks::Embedder;
use crate::embed_query::embed_query;
use crate::error::{RagError, Result};
use crate::flat_index::{FlatIndex, Hit};

#[derive(Clone, Debug)]
pub struct Retrieved<'a> {
    pub chunk: &'a Chunk,
    pub distance: f32,
}

/// Embeds `question` with the embedder that built `index` and resolves the
/// nearest `k` rows back to their chunks, best match first.
pub fn retrieve_top<'a>(
    question: &str,
    chunks: &'a [Chunk],
    embedder: &dyn Embedder,
    index: &FlatIndex,
    k: usize,
) -> Result<Vec<Retrieved<'a>>> {
    if chunks.len() != index.len() {
        return Err(RagError::Embedding(format!(
            "index holds {} vectors for {} chunks",
            index.len(),
            chunks.len()
        )));
    }
    if index.is_empty() {
        return Err(RagError::EmptyIndex);
    }
    let query_vec = embed_query(embedder, question)?;
    let hits = index.search(&query_vec, k)?;
    debug!(k, returned = hits.len(), "retrieved chunks");
    resolve_hits(chunks, &hits)
}

pub fn retrieve(
    question: &str,
    chunks: &[Chunk],
    embedder: &dyn Embedder,
    index: &FlatIndex,
    k: usize,
) -> Result<Vec<String>> {
    Ok(retrieve_top(question, chunks, embedder, index, k)?
        .into_iter()
        .map(|r| r.chunk.text.clone())
        .collect())
}

fn resolve_hits<'a>(chunks: &'a [Chunk], hits: &[Hit]) -> Result<Vec<Retrieved<'a>>> {
    hits.iter()
        .map(|hit| {
            let chunk = chunks.get(hit.index).ok_or_else(|| {
                RagError::Embedding(format!("index returned unknown chunk {}", hit.index))
            })?;
            Ok(Retrieved {
                chunk,
                distance: hit.distance,
            })
        })
        .collect()
}
