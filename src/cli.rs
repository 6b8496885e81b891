#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use bpaf::*;

use crate::{collect::DEFAULT_SUFFIX, config::DEFAULT_MODEL};

/// Parsed command line options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Root directory to scan.
    pub directory: PathBuf,
    /// File name suffix to match.
    pub extension: String,
    /// Model identifier.
    pub model:     String,
    /// Rubric file replacing the embedded rubric.
    pub rubric:    Option<PathBuf>,
    /// List matching files instead of evaluating them.
    pub dry_run:   bool,
    /// Enable debug logging.
    pub verbose:   bool,
}

/// Builds the command line parser.
pub fn options() -> OptionParser<Options> {
    let directory = short('d')
        .long("directory")
        .help("The directory to search for source files (required)")
        .argument::<PathBuf>("DIR");

    let extension = short('e')
        .long("extension")
        .help("File name suffix to match, case-sensitive")
        .argument::<String>("SUFFIX")
        .fallback(DEFAULT_SUFFIX.to_string())
        .display_fallback();

    let model = short('m')
        .long("model")
        .env("OPENAI_MODEL")
        .help("Model used to grade each file")
        .argument::<String>("MODEL")
        .fallback(DEFAULT_MODEL.to_string())
        .display_fallback();

    let rubric = short('r')
        .long("rubric")
        .help("Read the grading rubric from this file instead of the built-in one")
        .argument::<PathBuf>("PATH")
        .optional();

    let dry_run = long("dry-run")
        .help("Print the files that would be graded as JSON and exit")
        .switch();

    let verbose = short('v').long("verbose").help("Log debug output").switch();

    construct!(Options {
        directory,
        extension,
        model,
        rubric,
        dry_run,
        verbose,
    })
    .to_options()
    .descr("Grades the documentation of every matching file under a directory")
}
