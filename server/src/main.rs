mod config;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use llm::config::{EmbeddingConfig, LlmConfig};
use llm::{Embedder, LlmChat};
use services::answer::AnswerService;
use services::corpus::Corpus;
use services::index::VectorIndex;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cfg = config::ServerConfig::from_env();

    // Non-fatal: the answer route reports 503 until both pieces are present.
    let llm = load_llm();
    let corpus = load_corpus(&cfg);

    let answers = match (corpus, llm) {
        (Some(corpus), Some(llm)) => {
            let index = build_index(&corpus).await;
            let service = AnswerService::new(corpus, llm, cfg.top_k);
            Some(match index {
                Some((index, embedder)) => service.with_vector_index(index, embedder),
                None => service,
            })
        }
        _ => None,
    };
    if let Some(service) = &answers {
        tracing::info!(
            documents = service.corpus_len(),
            top_k = cfg.top_k,
            retrieval = service.retrieval_mode(),
            "answer service ready"
        );
    }

    let app = routes::app(state::AppState::new(answers));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port)).await?;

    tracing::info!(port = cfg.port, "queryform-server listening");
    axum::serve(listener, app).await
}

fn load_llm() -> Option<Arc<dyn LlmChat>> {
    let config = match LlmConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; answers disabled");
            return None;
        }
    };
    let (provider, model) = (config.provider, config.model.clone());
    match llm::connect(config) {
        Ok(client) => {
            tracing::info!(?provider, %model, "LLM client initialized");
            Some(client)
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client failed to build; answers disabled");
            None
        }
    }
}

/// Embed the corpus when an embedding provider is configured. Any failure
/// leaves retrieval lexical.
async fn build_index(corpus: &Corpus) -> Option<(VectorIndex, Arc<dyn Embedder>)> {
    let config = match EmbeddingConfig::from_env() {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::info!("no embedding provider; using lexical retrieval");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "embeddings not configured; using lexical retrieval");
            return None;
        }
    };
    let (model, batch_size) = (config.model.clone(), config.batch_size);
    let embedder = match llm::connect_embedder(config) {
        Ok(embedder) => embedder,
        Err(e) => {
            tracing::warn!(error = %e, "embedding client failed to build; using lexical retrieval");
            return None;
        }
    };
    match VectorIndex::build(corpus, embedder.as_ref(), batch_size).await {
        Ok(index) => {
            tracing::info!(%model, documents = index.len(), dimension = index.dimension(), "vector index built");
            Some((index, embedder))
        }
        Err(e) => {
            tracing::warn!(error = %e, "corpus embedding failed; using lexical retrieval");
            None
        }
    }
}

fn load_corpus(cfg: &config::ServerConfig) -> Option<Corpus> {
    match Corpus::load(&cfg.corpus_path, &cfg.corpus_field) {
        Ok(corpus) => {
            if corpus.is_empty() {
                tracing::warn!(field = %cfg.corpus_field, "corpus has no documents with this field");
            }
            tracing::info!(path = %cfg.corpus_path.display(), documents = corpus.len(), "corpus loaded");
            Some(corpus)
        }
        Err(e) => {
            tracing::warn!(error = %e, "corpus not loaded; answers disabled");
            None
        }
    }
}
