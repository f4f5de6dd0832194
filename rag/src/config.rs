use std::env;
use std::str::FromStr;

use crate::error::{RagError, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub source_dir: String,
    pub exclude_dirs: Vec<String>,
    pub max_file_bytes: u64,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub max_context_chars: usize,
    pub ollama_url: String,
    pub embed_model: String,
    pub chat_model: String,
    pub summary_model: String,
    pub system_prompt: String,
    pub summary_prompt: String,
    /// Documents up to this many characters are summarized in one call.
    pub summary_input_limit: usize,
    pub summary_chunk_size: usize,
    pub summary_chunk_overlap: usize,
    pub summary_min_chars: usize,
    /// Hard ceiling; longer documents are rejected instead of summarized.
    pub summary_max_chars: usize,
    pub request_timeout_secs: u64,
    pub preview_chars: usize,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: "./".to_string(),
            exclude_dirs: split_list(".git,target,node_modules,.idea,.vscode,dist,build,logs"),
            max_file_bytes: 20_000_000,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 3,
            max_context_chars: 4000,
            ollama_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            chat_model: "mistral:7b-instruct".to_string(),
            summary_model: "mistral:7b-instruct".to_string(),
            system_prompt: "You are a helpful document assistant. Answer using only the provided context. \
                 If the context does not contain the answer, say so."
                .to_string(),
            summary_prompt: "You are a summarization assistant. Produce a clear, structured summary of the content:\n\
                 - For a timetable or schedule, say what it is about and list the key time blocks with what happens in each.\n\
                 - For a story, list the key events and the moral under headings.\n\
                 - For a report or informative text, give the key points and conclusions.\n\
                 Use headings and bullet points, and state a goal or moral when there is one."
                .to_string(),
            summary_input_limit: 3000,
            summary_chunk_size: 3000,
            summary_chunk_overlap: 200,
            summary_min_chars: 50,
            summary_max_chars: 20_000,
            request_timeout_secs: 120,
            preview_chars: 3000,
            log_dir: "logs".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env if present so model endpoints work without manual `source .env`.
        let _ = dotenvy::dotenv();
        let d = Self::default();
        let chat_model = env::var("OLLAMA_CHAT_MODEL").unwrap_or(d.chat_model);
        Self {
            source_dir: env::var("RAG_SOURCE_DIR").unwrap_or(d.source_dir),
            exclude_dirs: env::var("RAG_EXCLUDE_DIRS")
                .map(|v| split_list(&v))
                .unwrap_or(d.exclude_dirs),
            max_file_bytes: parsed("RAG_MAX_FILE_BYTES", d.max_file_bytes),
            chunk_size: parsed("RAG_CHUNK_SIZE", d.chunk_size),
            chunk_overlap: parsed("RAG_CHUNK_OVERLAP", d.chunk_overlap),
            top_k: parsed("RAG_TOP_K", d.top_k),
            max_context_chars: parsed("RAG_MAX_CONTEXT_CHARS", d.max_context_chars),
            ollama_url: env::var("OLLAMA_URL").unwrap_or(d.ollama_url),
            embed_model: env::var("OLLAMA_EMBED_MODEL").unwrap_or(d.embed_model),
            summary_model: env::var("OLLAMA_SUMMARY_MODEL").unwrap_or_else(|_| chat_model.clone()),
            chat_model,
            system_prompt: env::var("RAG_SYSTEM_PROMPT").unwrap_or(d.system_prompt),
            summary_prompt: env::var("RAG_SUMMARY_PROMPT").unwrap_or(d.summary_prompt),
            summary_input_limit: parsed("RAG_SUMMARY_INPUT_LIMIT", d.summary_input_limit),
            summary_chunk_size: parsed("RAG_SUMMARY_CHUNK_SIZE", d.summary_chunk_size),
            summary_chunk_overlap: parsed("RAG_SUMMARY_CHUNK_OVERLAP", d.summary_chunk_overlap),
            summary_min_chars: parsed("RAG_SUMMARY_MIN_CHARS", d.summary_min_chars),
            summary_max_chars: parsed("RAG_SUMMARY_MAX_CHARS", d.summary_max_chars),
            request_timeout_secs: parsed("RAG_REQUEST_TIMEOUT_SECS", d.request_timeout_secs),
            preview_chars: parsed("RAG_PREVIEW_CHARS", d.preview_chars),
            log_dir: env::var("RAG_LOG_DIR").unwrap_or(d.log_dir),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_window("chunk", self.chunk_size, self.chunk_overlap)?;
        check_window("summary chunk", self.summary_chunk_size, self.summary_chunk_overlap)?;
        if self.top_k == 0 {
            return Err(RagError::Configuration("top_k must be at least 1".to_string()));
        }
        if self.max_context_chars == 0 {
            return Err(RagError::Configuration(
                "max_context_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn check_window(what: &str, size: usize, overlap: usize) -> Result<()> {
    if size == 0 {
        return Err(RagError::Configuration(format!("{} size must be positive", what)));
    }
    if overlap >= size {
        return Err(RagError::Configuration(format!(
            "{} overlap ({}) must be smaller than {} size ({})",
            what, overlap, what, size
        )));
    }
    Ok(())
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
