use tracing::{debug, info, warn};

use crate::build_prompt::Message;
use crate::chunk_text::chunk_text;
use crate::config::Config;
use crate::error::{RagError, Result};
use crate::generate::Generator;

/// Summarizes a whole document. Text within `summary_input_limit` characters
/// goes to the model in one call; longer text is cut into overlapping windows
/// that are summarized one by one and joined in order. A failing window
/// leaves an inline marker and does not stop the rest.
pub fn summarize(generator: &dyn Generator, cfg: &Config, text: &str) -> Result<String> {
    let text = text.trim();
    let len = text.chars().count();
    if len > cfg.summary_max_chars {
        return Err(RagError::OverLengthInput {
            len,
            max: cfg.summary_max_chars,
        });
    }
    if len == 0 {
        return Ok(String::new());
    }

    if len <= cfg.summary_input_limit {
        debug!(chars = len, "summarizing whole document");
        return Ok(match summarize_window(generator, cfg, text) {
            Ok(summary) => summary,
            Err(err) => {
                warn!(error = %err, "summary failed");
                format!("[summary failed: {}]", err)
            }
        });
    }

    let windows = chunk_text(text, cfg.summary_chunk_size, cfg.summary_chunk_overlap)?;
    let mut parts = Vec::with_capacity(windows.len());
    let mut failed = 0usize;

    for window in &windows {
        let body = window.text.trim();
        if body.chars().count() < cfg.summary_min_chars {
            debug!(window = window.index, "skipping near-empty window");
            continue;
        }
        match summarize_window(generator, cfg, body) {
            Ok(summary) => parts.push(summary.trim().to_string()),
            Err(err) => {
                failed += 1;
                warn!(window = window.index, error = %err, "window summary failed");
                parts.push(format!("[part {} failed: {}]", window.index + 1, err));
            }
        }
    }

    info!(windows = windows.len(), summarized = parts.len(), failed, "summarized document");
    Ok(parts.join("\n\n"))
}

fn summarize_window(generator: &dyn Generator, cfg: &Config, text: &str) -> Result<String> {
    let messages = vec![
        Message::system(cfg.summary_prompt.as_str()),
        Message::user(format!("Content:\n{}", text)),
    ];
    generator
        .generate(&messages)
        .map_err(RagError::into_generation)
}
