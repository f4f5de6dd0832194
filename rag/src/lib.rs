mod build_prompt;
mod chunk_text;
mod config;
mod embed_chunks;
mod embed_query;
mod error;
mod extract_text;
mod flat_index;
mod generate;
mod http;
mod retrieve_chunks;
mod scan_files;
mod session;
mod summarize;

pub use build_prompt::{build_context, build_prompt_with_context, truncate_chars, Message};
pub use chunk_text::{chunk_text, Chunk};
pub use config::Config;
pub use embed_chunks::{Embedder, OllamaEmbedder};
pub use embed_query::embed_query;
pub use error::{RagError, Result};
pub use extract_text::{extract_file, extract_text, preview, DocumentFormat};
pub use flat_index::{FlatIndex, Hit};
pub use generate::{answer, try_answer, Generator, OllamaGenerator};
pub use http::HttpClient;
pub use retrieve_chunks::{retrieve, retrieve_top, Retrieved};
pub use scan_files::scan_documents;
pub use session::{Answer, Models, Session};
pub use summarize::summarize;
