//! Line-oriented front end: one review per stdin line, recommendations on stdout.
//!
//! Configuration comes from the JSON file named by `DRUG_RECOMMENDER_CONFIG`
//! (defaults otherwise); `DRUG_RECOMMENDER_DATASET` overrides the dataset path.
//! Log verbosity follows `RUST_LOG`.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drug_recommender_core::{Recommendation, Recommender, RecommenderConfig};

const CONFIG_ENV: &str = "DRUG_RECOMMENDER_CONFIG";
const DATASET_ENV: &str = "DRUG_RECOMMENDER_DATASET";

/// Initialize logging to stderr so stdout stays clean for results.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config() -> Result<RecommenderConfig> {
    let mut config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => RecommenderConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.to_string_lossy()))?,
        None => RecommenderConfig::default(),
    };

    if let Some(dataset) = std::env::var_os(DATASET_ENV) {
        config.dataset_path = dataset.into();
    }

    Ok(config)
}

fn print_recommendation(out: &mut impl Write, recommendation: &Recommendation) -> io::Result<()> {
    if recommendation.is_empty() {
        return writeln!(out, "No recommendations found for the input review.");
    }

    writeln!(out, "Top recommended drugs:")?;
    for drug in recommendation.drugs() {
        writeln!(out, "{}", drug)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();

    let config = load_config()?;
    let recommender = Recommender::from_config(&config).with_context(|| {
        format!("Failed to load dataset {}", config.dataset_path.display())
    })?;
    info!(reviews = recommender.corpus().len(), "ready for reviews");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().split(b'\n') {
        let line = line.context("Failed to read review from stdin")?;
        let review = line.strip_suffix(b"\r").unwrap_or(&line[..]);

        match recommender.recommend_bytes(review) {
            Ok(recommendation) => print_recommendation(&mut out, &recommendation)?,
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
        out.flush()?;
    }

    Ok(())
}
