use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::build_prompt::build_context;
use crate::chunk_text::{chunk_text, chunk_texts, Chunk};
use crate::config::Config;
use crate::embed_chunks::{Embedder, OllamaEmbedder};
use crate::error::{RagError, Result};
use crate::extract_text::{extract_file, preview};
use crate::flat_index::{FlatIndex, Hit};
use crate::generate::{answer, Generator, OllamaGenerator};
use crate::http::HttpClient;
use crate::retrieve_chunks::retrieve_top;
use crate::summarize::summarize;

/// Model handles, constructed once and shared by every call in a session.
#[derive(Clone)]
pub struct Models {
    pub embedder: Arc<dyn Embedder>,
    pub generator: Arc<dyn Generator>,
    pub summarizer: Arc<dyn Generator>,
}

impl Models {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let http = HttpClient::new(Duration::from_secs(cfg.request_timeout_secs))?;
        Ok(Self {
            embedder: Arc::new(OllamaEmbedder::new(http.clone(), cfg)),
            generator: Arc::new(OllamaGenerator::new(http.clone(), &cfg.ollama_url, &cfg.chat_model)),
            summarizer: Arc::new(OllamaGenerator::new(http, &cfg.ollama_url, &cfg.summary_model)),
        })
    }
}

#[derive(Clone, Debug)]
pub struct Answer {
    pub text: String,
    pub context: String,
    pub hits: Vec<Hit>,
}

/// Chunks and the index built from their vectors. Created together and only
/// ever replaced as a whole.
struct IndexedDocument {
    chunks: Vec<Chunk>,
    index: FlatIndex,
}

pub struct Session {
    cfg: Config,
    models: Models,
    document: Option<String>,
    indexed: Option<IndexedDocument>,
}

impl Session {
    pub fn new(cfg: Config, models: Models) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            models,
            document: None,
            indexed: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replaces the document. Any index built from the previous one is dropped.
    pub fn load_document(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!(chars = text.chars().count(), "loaded document");
        self.indexed = None;
        self.document = Some(text);
    }

    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let text = extract_file(path, self.cfg.max_file_bytes)?;
        let chars = text.chars().count();
        self.load_document(text);
        Ok(chars)
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn preview(&self) -> Option<String> {
        self.document
            .as_deref()
            .map(|text| preview(text, self.cfg.preview_chars))
    }

    pub fn summarize(&self) -> Result<String> {
        let text = self.document.as_deref().ok_or(RagError::NoDocument)?;
        summarize(self.models.summarizer.as_ref(), &self.cfg, text)
    }

    /// Chunks, embeds and indexes the current document. Returns the chunk count.
    pub fn prepare(&mut self) -> Result<usize> {
        self.indexed = None;
        let text = self.document.as_deref().ok_or(RagError::NoDocument)?;

        let chunks = chunk_text(text, self.cfg.chunk_size, self.cfg.chunk_overlap)?;
        let vectors = self.models.embedder.embed_batch(&chunk_texts(&chunks))?;
        if vectors.len() != chunks.len() {
            return Err(RagError::Embedding(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                vectors.len()
            )));
        }
        let index = FlatIndex::build(&vectors)?;

        let count = chunks.len();
        info!(chunks = count, dimension = index.dimension(), "document indexed");
        self.indexed = Some(IndexedDocument { chunks, index });
        Ok(count)
    }

    pub fn is_prepared(&self) -> bool {
        self.indexed.is_some()
    }

    pub fn chunks(&self) -> &[Chunk] {
        self.indexed.as_ref().map(|d| d.chunks.as_slice()).unwrap_or(&[])
    }

    pub fn ask(&self, question: &str) -> Result<Answer> {
        self.ask_with_k(question, self.cfg.top_k)
    }

    pub fn ask_with_k(&self, question: &str, k: usize) -> Result<Answer> {
        if k == 0 {
            return Err(RagError::Configuration("k must be at least 1".to_string()));
        }
        let indexed = self.indexed.as_ref().ok_or(RagError::EmptyIndex)?;
        let retrieved = retrieve_top(
            question,
            &indexed.chunks,
            self.models.embedder.as_ref(),
            &indexed.index,
            k,
        )?;

        let texts: Vec<&str> = retrieved.iter().map(|r| r.chunk.text.as_str()).collect();
        let context = build_context(&texts, self.cfg.max_context_chars);
        let hits = retrieved
            .iter()
            .map(|r| Hit {
                index: r.chunk.index,
                distance: r.distance,
            })
            .collect();

        let text = answer(
            self.models.generator.as_ref(),
            &self.cfg.system_prompt,
            &context,
            question,
        );
        Ok(Answer { text, context, hits })
    }

    /// Drops the document and its index together.
    pub fn reset(&mut self) {
        self.indexed = None;
        self.document = None;
    }
}
