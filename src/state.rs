use std::sync::Arc;

use crate::answer::Answerer;
use crate::chunking::TokenChunker;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::indexer::Indexer;
use crate::llm::Provider;
use crate::project::{ProjectFiles, ProjectStore};
use crate::search::vector::VectorStore;
use crate::search::Retriever;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub projects: ProjectStore,
    pub chunker: TokenChunker,
    /// `None` in local mode
    pub provider: Option<Provider>,
    /// `None` in local mode
    pub indexer: Option<Indexer>,
    pub retriever: Retriever,
    pub answerer: Answerer,
    pub history: HistoryStore,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let projects = ProjectStore::open(&config.uploads_dir())?;
        let chunker = TokenChunker::cl100k(config.chunking)?;
        let vectors = Arc::new(VectorStore::open_or_create(&config.vector_dir())?);

        let db_path = config.db_path();
        let history = HistoryStore::new(&db_path.to_string_lossy()).await?;

        let provider = config.provider.clone().map(Provider::new).transpose()?;

        let (retriever, answerer, indexer) = match &provider {
            Some(provider) => (
                Retriever::Vector {
                    provider: provider.clone(),
                    store: vectors.clone(),
                },
                Answerer::Provider(provider.clone()),
                Some(Indexer::new(provider.clone(), vectors.clone())),
            ),
            None => (
                Retriever::Keyword {
                    files: Arc::new(ProjectFiles::new(projects.uploads_dir())),
                },
                Answerer::Local,
                None,
            ),
        };

        tracing::info!(
            "Running in {} mode ({} stored vectors)",
            config.mode().as_str(),
            vectors.count()
        );

        Ok(Self {
            config: Arc::new(config),
            projects,
            chunker,
            provider,
            indexer,
            retriever,
            answerer,
            history,
        })
    }
}
