use std::fmt::Write as _;

use anyhow::Result;

use crate::llm::{ChatMessage, Provider};
use crate::models::Chunk;
use crate::search::keyword::{extract_keywords, line_matches};

/// Returned when retrieval produced nothing to answer from.
pub const NO_INFORMATION: &str = "No relevant information found.";
/// Returned when the code handed in does not answer the question.
pub const NOT_FOUND: &str = "Not found in provided code.";

const SYSTEM_PROMPT: &str = "You are a senior backend engineer.";
/// Matching lines quoted per chunk in local answers
const LINES_PER_CHUNK: usize = 5;

/// Answer strategy, fixed at startup by whether a provider is configured.
#[derive(Clone)]
pub enum Answerer {
    Provider(Provider),
    Local,
}

impl Answerer {
    pub async fn generate(&self, question: &str, chunks: &[Chunk]) -> Result<String> {
        if chunks.is_empty() {
            return Ok(NO_INFORMATION.to_string());
        }

        match self {
            Answerer::Provider(provider) => {
                let messages = [
                    ChatMessage::system(SYSTEM_PROMPT),
                    ChatMessage::user(build_prompt(question, chunks)),
                ];
                let answer = provider.complete(&messages, 0.0).await?;
                Ok(answer.trim().to_string())
            }
            Answerer::Local => Ok(local_answer(question, chunks)),
        }
    }
}

/// Prompt asking the model to answer strictly from the labelled code.
pub fn build_prompt(question: &str, chunks: &[Chunk]) -> String {
    let mut context = String::new();
    for chunk in chunks {
        let _ = write!(context, "\n\nFile: {}\n{}", chunk.file_path, chunk.content);
    }

    format!(
        "You are analyzing a software codebase.\n\n\
         Answer the question ONLY using the provided code.\n\
         Do not guess.\n\
         If the answer is not present, say:\n\
         \"{NOT_FOUND}\"\n\n\
         Be precise:\n\
         - Mention exact file paths\n\
         - Mention function names\n\
         - Be concise\n\n\
         Question:\n{question}\n\n\
         Code:\n{context}\n"
    )
}

/// Quote the lines of each chunk that mention a question keyword, grouped
/// under the chunk's file path.
pub fn local_answer(question: &str, chunks: &[Chunk]) -> String {
    let keywords = extract_keywords(question);
    if keywords.is_empty() {
        return NOT_FOUND.to_string();
    }

    let mut sections = Vec::new();
    for chunk in chunks {
        let matched: Vec<&str> = chunk
            .content
            .split('\n')
            .filter(|line| line_matches(line, &keywords))
            .map(str::trim)
            .take(LINES_PER_CHUNK)
            .collect();
        if matched.is_empty() {
            continue;
        }

        let mut section = format!("File: {}\nRelevant lines:", chunk.file_path);
        for line in matched {
            let _ = write!(section, "\n  - {line}");
        }
        sections.push(section);
    }

    if sections.is_empty() {
        NOT_FOUND.to_string()
    } else {
        sections.join("\n\n")
    }
}
