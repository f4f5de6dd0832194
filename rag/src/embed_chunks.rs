use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{RagError, Result};
use crate::http::HttpClient;

/// Maps text to fixed-length vectors. The same embedder must be used for a
/// document's chunks and for every question asked against them.
pub trait Embedder: Send + Sync {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("empty embedding response".to_string()))
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Serialize)]
struct EmbedLegacyRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

pub struct OllamaEmbedder {
    http: HttpClient,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(http: HttpClient, cfg: &Config) -> Self {
        Self {
            http,
            base_url: cfg.ollama_url.trim_end_matches('/').to_string(),
            model: cfg.embed_model.clone(),
        }
    }

    fn embed_legacy(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let req = EmbedLegacyRequest {
                model: &self.model,
                prompt: text,
            };
            let res = self.http.post_json::<Value, _>(&url, &req)?;
            out.extend(parse_embeddings(res)?);
        }
        Ok(out)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let url = format!("{}/api/embed", self.base_url);
        let req = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let vectors = match self.http.post_json::<Value, _>(&url, &req) {
            Ok(res) => parse_embeddings(res)?,
            Err(RagError::Timeout(url)) => return Err(RagError::Timeout(url)),
            Err(err) => {
                warn!(error = %err, "batch embed endpoint failed, falling back to legacy endpoint");
                self.embed_legacy(texts)?
            }
        };
        if vectors.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "expected {} vectors, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        debug!(count = vectors.len(), model = %self.model, "embedded texts");
        Ok(vectors)
    }
}

pub(crate) fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>> {
    if let Some(embeddings) = value.get("embeddings") {
        return parse_embeddings_value(embeddings);
    }
    if let Some(embedding) = value.get("embedding") {
        return parse_embeddings_value(embedding);
    }
    Err(RagError::Embedding("no embeddings in response".to_string()))
}

fn parse_embeddings_value(value: &Value) -> Result<Vec<Vec<f32>>> {
    let arr = value
        .as_array()
        .ok_or_else(|| RagError::Embedding("invalid embeddings format".to_string()))?;
    if arr.is_empty() {
        return Ok(vec![]);
    }
    if arr[0].is_array() {
        return arr.iter().map(parse_vec).collect();
    }
    Ok(vec![parse_vec(value)?])
}

fn parse_vec(value: &Value) -> Result<Vec<f32>> {
    let arr = value
        .as_array()
        .ok_or_else(|| RagError::Embedding("embedding is not an array".to_string()))?;
    arr.iter()
        .map(|v| {
            let n = v
                .as_f64()
                .ok_or_else(|| RagError::Embedding("embedding value is not a number".to_string()))?;
            let n = n as f32;
            if !n.is_finite() {
                return Err(RagError::Embedding("embedding value is out of range".to_string()));
            }
            Ok(n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_matrix_and_single_vector_shapes() {
        let matrix = parse_embeddings(json!({"embeddings": [[1.0, 2.0], [3.0, 4.0]]})).unwrap();
        assert_eq!(matrix, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        let single = parse_embeddings(json!({"embedding": [0.5, 0.25]})).unwrap();
        assert_eq!(single, vec![vec![0.5, 0.25]]);
    }

    #[test]
    fn rejects_missing_or_malformed_embeddings() {
        assert!(parse_embeddings(json!({"model": "x"})).is_err());
        assert!(parse_embeddings(json!({"embedding": ["a"]})).is_err());
        assert!(parse_embeddings(json!({"embedding": [1.0e300, 0.0]})).is_err());
    }
}
