#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest,
    },
};

use crate::{
    config::OpenAiEnv,
    dispatch::{EvaluationRequest, Evaluator},
    error::DocCheckError,
};

/// [`Evaluator`] backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiEvaluator {
    /// Client constructed once and reused for every request.
    client: OpenAIClient<OpenAIConfig>,
}

impl OpenAiEvaluator {
    /// Creates an evaluator for the endpoint and key in `env`.
    pub fn new(env: &OpenAiEnv) -> Self {
        let client = OpenAIClient::with_config(
            OpenAIConfig::new()
                .with_api_base(env.api_base().to_owned())
                .with_api_key(env.api_key().to_owned()),
        );
        Self { client }
    }
}

/// Converts an [`EvaluationRequest`] into a chat completion request with a
/// system turn followed by a user turn.
pub fn build_chat_request(
    request: &EvaluationRequest<'_>,
) -> Result<CreateChatCompletionRequest, DocCheckError> {
    let build_err = |e: async_openai::error::OpenAIError| {
        DocCheckError::Service(format!("could not build chat request: {e}"))
    };

    let messages = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(request.instructions().to_string())
            .build()
            .map_err(build_err)?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(request.content().to_string())
            .build()
            .map_err(build_err)?
            .into(),
    ];

    Ok(CreateChatCompletionRequest {
        model: request.model().to_owned(),
        messages,
        temperature: Some(request.temperature()),
        n: Some(1),
        stream: Some(false),
        ..Default::default()
    })
}

impl Evaluator for OpenAiEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest<'_>) -> Result<String, DocCheckError> {
        let chat_request = build_chat_request(request)?;
        tracing::debug!("Sending {} bytes to {}", request.content().len(), request.model());

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| DocCheckError::Service(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| DocCheckError::Service("No content in OpenAI response".into()))
    }
}
