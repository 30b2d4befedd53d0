//! The AI examiner -- the production implementation of the generation
//! dependency seam.
//!
//! Dispatches exhaustively on the request variant: question generation
//! builds a prompt from the assembled source files, verdict generation
//! from the code plus question/answer pairs. Every failure (transport,
//! upstream status, unparseable output) is collapsed into a
//! [`GenerationError`] message for the job record; the worker never sees
//! anything richer.

use chatexam_core::job::{Generate, GenerationError, GenerationOutput, GenerationRequest};
use chatexam_core::prompt;

use crate::client::GeminiClient;
use crate::parse;

/// Generates exam questions and grading verdicts via the Gemini API.
pub struct Examiner {
    client: GeminiClient,
}

impl Examiner {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Generate for Examiner {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        match request {
            GenerationRequest::Questions {
                files,
                question_count,
            } => {
                let prompt = prompt::build_questions_prompt(files, *question_count);
                let text = self
                    .client
                    .complete(&prompt)
                    .await
                    .map_err(|e| GenerationError(format!("Question generation failed: {e}")))?;
                let questions = parse::parse_questions(&text)
                    .map_err(|e| GenerationError(format!("Question generation failed: {e}")))?;
                Ok(GenerationOutput::Questions(questions))
            }
            GenerationRequest::Verdict {
                code,
                questions,
                answers,
            } => {
                let prompt = prompt::build_verdict_prompt(code, questions, answers);
                let text = self
                    .client
                    .complete(&prompt)
                    .await
                    .map_err(|e| GenerationError(format!("Verdict generation failed: {e}")))?;
                let (verdict, rating) = parse::parse_verdict(&text)
                    .map_err(|e| GenerationError(format!("Verdict generation failed: {e}")))?;
                Ok(GenerationOutput::Verdict { verdict, rating })
            }
        }
    }
}
