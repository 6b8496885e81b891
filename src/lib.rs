//! # docgrade
//!
//! Walks a directory tree, sends each matching source file to a language model
//! together with a fixed grading rubric, and prints the model's verdict for
//! every file.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Command line parsing
pub mod cli;
/// Recursive discovery and reading of source files
pub mod collect;
/// Environment, model and rubric settings
pub mod config;
/// Sequential evaluation of files and printing of verdicts
pub mod dispatch;
/// Error taxonomy for a grading run
pub mod error;
/// Chat completions backend
pub mod openai;

use std::{io::Write, path::PathBuf};

use serde::Serialize;

use collect::{Collector, validate_root};
pub use config::RunConfig;
use dispatch::{DispatchReport, Dispatcher, Evaluator};
pub use error::{DocCheckError, ErrorKind};

/// Evaluates every matching file under `config.root` with `evaluator`, writing
/// verdicts to `out`.
///
/// The root is validated before any file is touched.
pub async fn grade<E, W>(
    config: &RunConfig,
    evaluator: &E,
    out: &mut W,
) -> Result<DispatchReport, DocCheckError>
where
    E: Evaluator,
    W: Write,
{
    validate_root(&config.root)?;

    let collector = Collector::new(config.root.clone(), config.suffix.clone());
    let dispatcher = Dispatcher::new(evaluator, &config.model, &config.rubric);
    let report = dispatcher.dispatch(collector.files(), out).await?;

    tracing::info!(
        "Evaluated {} file(s) ending in `{}` under {}",
        report.dispatched,
        config.suffix,
        config.root.display()
    );
    Ok(report)
}

/// A file that would be sent for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredFile {
    /// Location of the file.
    pub path:  PathBuf,
    /// Size on disk.
    pub bytes: u64,
}

/// Lists the files that [`grade`] would evaluate, without reading them.
pub fn discover(config: &RunConfig) -> Result<Vec<DiscoveredFile>, DocCheckError> {
    validate_root(&config.root)?;
    Collector::new(config.root.clone(), config.suffix.clone())
        .paths()
        .map(|path| {
            let path = path?;
            match std::fs::metadata(&path) {
                Ok(meta) => Ok(DiscoveredFile {
                    bytes: meta.len(),
                    path,
                }),
                Err(source) => Err(DocCheckError::Read { path, source }),
            }
        })
        .collect()
}
