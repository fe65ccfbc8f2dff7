//! Keyword-frequency search used when no embedding provider is configured.
//!
//! Everything here is pure: callers hand in the project's files and get back
//! ranked snippets, so ranking can be tested without touching the disk.

use crate::models::Chunk;
use crate::project::SourceFile;

/// Words that carry no signal in questions about code.
const STOP_WORDS: &[&str] = &[
    "where", "is", "the", "a", "an", "how", "what", "when", "why", "does", "do", "are", "handled",
    "in", "of", "to", "for",
];

/// Path fragments that mark files worth a fixed bonus.
const IMPORTANT_PATH_PARTS: &[&str] = &["server", "controller", "route", "middleware", "auth", "model"];

const KEYWORD_WEIGHT: usize = 3;
pub const PATH_BONUS: usize = 5;
/// Files kept after ranking
pub const TOP_FILES: usize = 20;
/// Matching lines kept per file
pub const SNIPPET_LINES: usize = 20;

/// Lower-cased question words with punctuation, stop words and words of
/// two characters or fewer removed. Order and repeats are preserved, so a
/// word asked twice counts twice when scoring.
pub fn extract_keywords(question: &str) -> Vec<String> {
    let cleaned: String = question
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// True when `line` contains any keyword, ignoring case.
pub fn line_matches(line: &str, keywords: &[String]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Relevance of one file: 3 points per keyword occurrence, plus a flat
/// bonus when the path looks like server-side plumbing.
pub fn score_file(path: &str, content: &str, keywords: &[String]) -> usize {
    let lower_content = content.to_lowercase();
    let occurrences: usize = keywords
        .iter()
        .map(|k| lower_content.matches(k.as_str()).count())
        .sum();

    let lower_path = path.to_lowercase();
    let bonus = if IMPORTANT_PATH_PARTS.iter().any(|p| lower_path.contains(p)) {
        PATH_BONUS
    } else {
        0
    };

    occurrences * KEYWORD_WEIGHT + bonus
}

#[derive(Debug, Clone)]
pub struct ScoredFile<'a> {
    pub file: &'a SourceFile,
    pub score: usize,
}

/// Files with a positive score, best first. Ties keep their listing order.
pub fn rank_files<'a>(files: &'a [SourceFile], keywords: &[String]) -> Vec<ScoredFile<'a>> {
    let mut ranked: Vec<ScoredFile<'a>> = files
        .iter()
        .map(|file| ScoredFile {
            file,
            score: score_file(&file.relative_path, &file.content, keywords),
        })
        .filter(|s| s.score > 0)
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// The first matching lines of `content`, joined by newlines.
pub fn extract_snippet(content: &str, keywords: &[String]) -> String {
    content
        .split('\n')
        .filter(|line| line_matches(line, keywords))
        .take(SNIPPET_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rank `files` against the question's keywords and return up to `limit`
/// snippet chunks. Snippets carry no line numbers.
pub fn keyword_search(files: &[SourceFile], question: &str, limit: usize) -> Vec<Chunk> {
    let keywords = extract_keywords(question);
    if keywords.is_empty() {
        return Vec::new();
    }

    rank_files(files, &keywords)
        .into_iter()
        .take(TOP_FILES)
        .filter_map(|scored| {
            let snippet = extract_snippet(&scored.file.content, &keywords);
            if snippet.trim().is_empty() {
                return None;
            }
            Some(Chunk {
                file_path: scored.file.relative_path.clone(),
                content: snippet,
                start_line: None,
                end_line: None,
            })
        })
        .take(limit)
        .collect()
}
