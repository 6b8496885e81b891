#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # docgrade
//!
//! Grades the documentation of every source file under a directory by asking a
//! language model, and prints one verdict per file.
//!
//! Credentials are read from `OPENAI_API_KEY` (and optionally
//! `OPENAI_ENDPOINT`), either from the environment or from a `.env` file in the
//! working directory.

use std::io::Write;

use anyhow::{Context, Result};
use docgrade::{
    RunConfig, cli,
    config::{OpenAiEnv, load_rubric},
    discover, grade,
    openai::OpenAiEvaluator,
};
use dotenvy::dotenv;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Installs a stderr logger so stdout only carries verdicts.
fn init_logging(verbose: bool) {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter_layer = LevelFilter::from_level(level);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let opts = cli::options().run();
    init_logging(opts.verbose);

    let config = RunConfig {
        root:   opts.directory,
        suffix: opts.extension,
        model:  opts.model,
        rubric: load_rubric(opts.rubric.as_deref())?,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if opts.dry_run {
        let files = discover(&config)?;
        let listing = serde_json::to_string_pretty(&files)
            .context("Could not serialize the list of discovered files")?;
        writeln!(out, "{listing}").context("Could not write to stdout")?;
        return Ok(());
    }

    let env = OpenAiEnv::from_env(config.model.clone())?;
    tracing::debug!("Using {} at {}", env.model(), env.api_base());
    let evaluator = OpenAiEvaluator::new(&env);

    grade(&config, &evaluator, &mut out)
        .await
        .with_context(|| format!("Grading files under {} failed", config.root.display()))?;

    Ok(())
}
