//! Offline artifact builder.
//!
//! Reads a JSON corpus, fits the lexical models on `title + abstract` and
//! writes every artifact the server loads. With `--dense`, also embeds each
//! document and writes the flat vector index and its metadata sidecar.

use clap::Parser;
use docsearch_core::bm25::{Bm25Index, Bm25Params};
use docsearch_core::config;
use docsearch_core::corpus::Corpus;
use docsearch_core::tfidf::{TfidfModel, TfidfOptions};
use docsearch_core::tokenizer::TokenizerConfig;
use docsearch_core::vector::{DistanceMetric, FlatIndex};
use docsearch_server::context::ArtifactPaths;
use docsearch_server::embedding::{self, EmbeddingArgs};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const EMBED_BATCH_SIZE: usize = 64;

#[derive(Parser)]
#[command(name = "docsearch-build", about = "Build docsearch artifacts from a JSON corpus")]
struct Args {
    /// JSON array of document records
    #[arg(long)]
    corpus: PathBuf,

    /// Output directory for the artifacts
    #[arg(short, long, default_value = config::DEFAULT_MODELS_DIR)]
    out_dir: PathBuf,

    /// Drop English stop words before fitting
    #[arg(long, default_value_t = false)]
    stop_words: bool,

    /// Use 1 + ln(tf) for TF-IDF term frequencies
    #[arg(long, default_value_t = false)]
    sublinear_tf: bool,

    /// Minimum document frequency for a TF-IDF term
    #[arg(long, default_value_t = 1)]
    min_df: u32,

    /// Keep only the most frequent TF-IDF terms
    #[arg(long)]
    max_features: Option<usize>,

    /// Also build the dense index (requires a reachable embedding backend)
    #[arg(long, default_value_t = false)]
    dense: bool,

    /// Distance metric for the dense index (l2, cosine, dot)
    #[arg(long, default_value = "l2")]
    metric: String,

    #[command(flatten)]
    embedding: EmbeddingArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("docsearch_server=info".parse()?)
                .add_directive("docsearch_core=info".parse()?)
                .add_directive("docsearch_build=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let metric = DistanceMetric::parse(&args.metric)
        .ok_or_else(|| format!("unknown distance metric '{}'", args.metric))?;

    let corpus = Corpus::load(&args.corpus)?;
    if corpus.is_empty() {
        return Err(format!("corpus {:?} contains no documents", args.corpus).into());
    }
    std::fs::create_dir_all(&args.out_dir)?;
    let paths = ArtifactPaths::in_dir(&args.out_dir);
    tracing::info!(documents = corpus.len(), out_dir = ?args.out_dir, "Building artifacts");

    let texts: Vec<String> = corpus
        .documents()
        .iter()
        .map(|d| d.indexable_text())
        .collect();
    let tokenizer = TokenizerConfig {
        stop_words: args.stop_words,
    };

    let start = Instant::now();
    let tfidf = TfidfModel::fit(
        texts.iter().map(String::as_str),
        TfidfOptions {
            tokenizer,
            sublinear_tf: args.sublinear_tf,
            min_df: args.min_df,
            max_features: args.max_features,
            ..TfidfOptions::default()
        },
    );
    tfidf.save(&paths.tfidf_model)?;
    corpus.save(&paths.tfidf_documents)?;
    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "TF-IDF model written");

    let start = Instant::now();
    let bm25 = Bm25Index::fit(
        texts.iter().map(String::as_str),
        Bm25Params::default(),
        tokenizer,
    );
    bm25.save(&paths.bm25_model)?;
    corpus.save(&paths.bm25_documents)?;
    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "BM25 model written");

    if args.dense {
        let start = Instant::now();
        let embedder = embedding::connect(&args.embedding, &paths.models_dir).await?;
        let mut index: Option<FlatIndex> = None;
        for (n, batch) in texts.chunks(EMBED_BATCH_SIZE).enumerate() {
            let vectors = embedder.embed_batch(batch).await?;
            for vector in vectors {
                let index = index.get_or_insert_with(|| FlatIndex::new(vector.len(), metric));
                index.add(&vector)?;
            }
            tracing::info!(
                embedded = ((n + 1) * EMBED_BATCH_SIZE).min(texts.len()),
                total = texts.len(),
                "Embedding documents"
            );
        }
        let index = index.ok_or("embedding backend returned no vectors")?;
        index.save(&paths.dense_index)?;
        corpus.save(&paths.dense_metadata)?;
        tracing::info!(
            dimension = index.dimension(),
            model = embedder.model_name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dense index written"
        );
    }

    tracing::info!("All artifacts written to {:?}", args.out_dir);
    Ok(())
}
