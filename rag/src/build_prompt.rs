#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Joins retrieved chunks with newlines in retrieval order and cuts the
/// result to at most `max_chars` characters. The budget covers the context
/// only; prompt scaffolding is added afterwards.
pub fn build_context<S: AsRef<str>>(chunks: &[S], max_chars: usize) -> String {
    let joined = chunks
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    truncate_chars(&joined, max_chars).to_string()
}

pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Context always precedes the question so the model reads the evidence first.
pub fn build_prompt_with_context(system_prompt: &str, context: &str, question: &str) -> Vec<Message> {
    let context = if context.trim().is_empty() {
        "(no context found)"
    } else {
        context
    };

    let user_content = format!(
        "Use the context below to answer the question.\n\nContext:\n{}\n\nQuestion: {}",
        context, question
    );

    vec![Message::system(system_prompt), Message::user(user_content)]
}
