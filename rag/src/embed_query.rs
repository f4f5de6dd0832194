use crate::embed_chunks::Embedder;
use crate::error::{RagError, Result};

pub fn embed_query(embedder: &dyn Embedder, question: &str) -> Result<Vec<f32>> {
    let vector = embedder.embed(question)?;
    if vector.is_empty() {
        return Err(RagError::Embedding("question produced an empty vector".to_string()));
    }
    Ok(vector)
}
