#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use crate::error::DocCheckError;

/// Model used when neither `--model` nor `OPENAI_MODEL` is set.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// API base used when `OPENAI_ENDPOINT` is unset.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Java documentation rubric embedded in the binary.
pub const DEFAULT_RUBRIC: &str = include_str!("prompts/java_doc_rubric.md");

/// OpenAI credentials and endpoint settings sourced from the environment.
#[derive(Clone)]
pub struct OpenAiEnv {
    /// Base URL for the OpenAI-compatible API endpoint.
    api_base: String,
    /// API key used to authenticate requests.
    api_key:  String,
    /// Model identifier for chat completions.
    model:    String,
}

impl std::fmt::Debug for OpenAiEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEnv")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiEnv {
    /// Creates settings from explicit values.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            api_key:  api_key.into(),
            model:    model.into(),
        }
    }

    /// Reads `OPENAI_API_KEY` and `OPENAI_ENDPOINT` from the process
    /// environment.
    pub fn from_env(model: impl Into<String>) -> Result<Self, DocCheckError> {
        Self::from_vars(|name| std::env::var(name).ok(), model)
    }

    /// Builds settings from an arbitrary variable lookup.
    ///
    /// The API key is required. The endpoint falls back to
    /// [`DEFAULT_API_BASE`]. Blank values count as unset.
    pub fn from_vars<F>(var: F, model: impl Into<String>) -> Result<Self, DocCheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            var(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key = read("OPENAI_API_KEY").ok_or_else(|| {
            DocCheckError::Config("OPENAI_API_KEY must be set to evaluate files".into())
        })?;
        let api_base = read("OPENAI_ENDPOINT").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let model = model.into();
        if model.trim().is_empty() {
            return Err(DocCheckError::Config("model identifier must not be empty".into()));
        }

        Ok(Self {
            api_base,
            api_key,
            model,
        })
    }

    /// Returns the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Loads the rubric from `path`, or returns the embedded rubric when no path
/// is given.
pub fn load_rubric(path: Option<&Path>) -> Result<String, DocCheckError> {
    let Some(path) = path else {
        return Ok(DEFAULT_RUBRIC.to_string());
    };

    let text = std::fs::read_to_string(path).map_err(|source| DocCheckError::Rubric {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Err(DocCheckError::Input(format!("rubric file `{}` is empty", path.display())));
    }
    Ok(text)
}

/// Settings fixed for the duration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory to scan.
    pub root:   PathBuf,
    /// Required file name suffix.
    pub suffix: String,
    /// Model identifier sent with every request.
    pub model:  String,
    /// Instruction text sent as the system turn of every request.
    pub rubric: String,
}
