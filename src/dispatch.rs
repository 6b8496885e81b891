#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::io::Write;

use crate::{collect::SourceFile, error::DocCheckError};

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.0;

/// One evaluation exchange: the rubric as the system turn and a file's text
/// as the user turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationRequest<'a> {
    /// Model identifier.
    model:        &'a str,
    /// Rubric text.
    instructions: &'a str,
    /// File contents being graded.
    content:      &'a str,
    /// Sampling temperature, always [`TEMPERATURE`].
    temperature:  f32,
}

impl<'a> EvaluationRequest<'a> {
    /// Creates a request with the fixed temperature.
    pub fn new(model: &'a str, instructions: &'a str, content: &'a str) -> Self {
        Self {
            model,
            instructions,
            content,
            temperature: TEMPERATURE,
        }
    }

    /// Model identifier.
    pub fn model(&self) -> &'a str {
        self.model
    }

    /// Rubric text for the system turn.
    pub fn instructions(&self) -> &'a str {
        self.instructions
    }

    /// File text for the user turn.
    pub fn content(&self) -> &'a str {
        self.content
    }

    /// Sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// Something that can grade one file and return the verdict text.
pub trait Evaluator {
    /// Sends `request` and resolves to the completion text.
    fn evaluate(
        &self,
        request: &EvaluationRequest<'_>,
    ) -> impl Future<Output = Result<String, DocCheckError>>;
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of evaluations written to the output.
    pub dispatched: usize,
}

/// Sends files to an [`Evaluator`] one at a time and prints each verdict.
pub struct Dispatcher<'a, E> {
    /// Backend that performs the evaluation.
    evaluator: &'a E,
    /// Model identifier sent with every request.
    model:     &'a str,
    /// Rubric sent with every request.
    rubric:    &'a str,
}

impl<'a, E: Evaluator> Dispatcher<'a, E> {
    /// Creates a dispatcher using `evaluator` with a fixed model and rubric.
    pub fn new(evaluator: &'a E, model: &'a str, rubric: &'a str) -> Self {
        Self {
            evaluator,
            model,
            rubric,
        }
    }

    /// Builds the request for one file.
    pub fn request_for<'f>(&'f self, file: &'f SourceFile) -> EvaluationRequest<'f> {
        EvaluationRequest::new(self.model, self.rubric, file.contents())
    }

    /// Evaluates every file in order, writing each verdict followed by a blank
    /// line to `out`.
    ///
    /// The next item is not pulled from `files` until the previous verdict has
    /// been flushed. The first error, from either the sequence or the
    /// evaluator, ends the run.
    pub async fn dispatch<I, W>(
        &self,
        files: I,
        out: &mut W,
    ) -> Result<DispatchReport, DocCheckError>
    where
        I: IntoIterator<Item = Result<SourceFile, DocCheckError>>,
        W: Write,
    {
        let mut report = DispatchReport::default();

        for file in files {
            if let Err(e) = self.dispatch_one(file, out).await {
                tracing::warn!("Stopping after {} evaluation(s)", report.dispatched);
                return Err(e);
            }
            report.dispatched += 1;
        }

        Ok(report)
    }

    /// Evaluates and prints a single item of the sequence.
    async fn dispatch_one<W: Write>(
        &self,
        file: Result<SourceFile, DocCheckError>,
        out: &mut W,
    ) -> Result<(), DocCheckError> {
        let file = file?;
        tracing::info!("Evaluating {}", file.path().display());

        let verdict = self.evaluator.evaluate(&self.request_for(&file)).await?;

        writeln!(out, "{verdict}\n").map_err(DocCheckError::Output)?;
        out.flush().map_err(DocCheckError::Output)
    }
}
