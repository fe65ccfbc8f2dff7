//! # codebase-qa
//!
//! An HTTP service that answers natural-language questions about an
//! uploaded codebase. Projects arrive as a zip archive or a git URL, are
//! split into overlapping token windows, and are queried either through an
//! OpenAI-compatible provider or entirely locally.
//!
//! ## Architecture
//!
//! ```text
//!         POST /upload                          POST /ask
//!              │                                    │
//!              ▼                                    ▼
//!   ┌─────────────────────┐            ┌─────────────────────┐
//!   │      Workspace      │            │      Retriever      │
//!   │ zip extract / clone │            │  Vector  │ Keyword  │
//!   └──────────┬──────────┘            └──────────┬──────────┘
//!              │ code files                       │ at most 5 chunks
//!              ▼                                  ▼
//!   ┌─────────────────────┐            ┌─────────────────────┐
//!   │       Chunker       │            │      Answerer       │
//!   │ cl100k, 800 / 150   │            │ Provider │  Local   │
//!   └──────────┬──────────┘            └──────────┬──────────┘
//!              │ provider mode only               │
//!              ▼                                  ▼
//!   ┌─────────────────────┐            ┌─────────────────────┐
//!   │ Indexer → Vectors   │            │   History (SQLite)  │
//!   └─────────────────────┘            └─────────────────────┘
//! ```
//!
//! Provider mode is selected once at startup when `OPENAI_API_KEY` is set;
//! otherwise every request uses keyword scanning and line extraction.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, data dirs, provider and chunking
//! - [`models`] - Shared data types: `Chunk`, `QaRecord`, request/response bodies
//! - [`error`] - Domain error enums for the workspace, chunker and history store
//! - [`project`] - Project directories, zip extraction, git clone and code-file listing
//! - [`chunking`] - Overlapping token-window chunking with line estimates
//! - [`llm`] - OpenAI-compatible embeddings, chat completions and model listing
//! - [`indexer`] - Embeds chunks into the vector store, per project
//! - [`search::vector`] - Disk-persisted vector store with cosine similarity search
//! - [`search::keyword`] - Keyword-frequency file ranking and snippet extraction
//! - [`answer`] - Prompted or local answer generation
//! - [`history`] - SQLite log of answered questions
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state wiring the services together

pub mod answer;
pub mod api;
pub mod chunking;
pub mod config;
pub mod error;
pub mod history;
pub mod indexer;
pub mod llm;
pub mod models;
pub mod project;
pub mod search;
pub mod state;
