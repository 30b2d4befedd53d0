//! Prompt assembly for the AI examiner.
//!
//! Pure string building: the content assembler folds a file-name -> source
//! mapping into one prompt body, and the prompt builders wrap it in the
//! JSON-only instruction contract the examiner expects. No timestamps, no
//! randomness; identical inputs always produce identical strings.

use indexmap::IndexMap;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Hard ceiling on questions per exam; requests above this are capped.
pub const MAX_QUESTIONS: u32 = 6;

/// Questions per exam when the caller does not specify a count.
pub const DEFAULT_QUESTION_COUNT: u32 = 3;

/// Word limit per generated question, stated in the prompt contract.
pub const MAX_QUESTION_WORDS: u32 = 12;

// ---------------------------------------------------------------------------
// Content assembly
// ---------------------------------------------------------------------------

/// Fold a file-name -> source-text mapping into a single prompt body.
///
/// Each file appears under a `### File:` header, in the mapping's iteration
/// order. The result ends with a trailing newline.
pub fn assemble_content(files: &IndexMap<String, String>) -> String {
    let mut out = String::new();
    for (name, source) in files {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("### File: ");
        out.push_str(name);
        out.push('\n');
        out.push_str(source);
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Prompt builders
// ---------------------------------------------------------------------------

/// Instruction block for question generation.
///
/// `question_count` is capped at [`MAX_QUESTIONS`]. The contract demands a
/// bare JSON object of question-id -> question text so the response can be
/// parsed without heuristics.
pub fn question_instructions(question_count: u32) -> String {
    let count = question_count.min(MAX_QUESTIONS);
    format!(
        "Respond ONLY with valid JSON. No text outside JSON.\n\
         Write exactly {count} short exam questions about the code below \
         (max {MAX_QUESTION_WORDS} words each).\n\
         Return ONLY this format: {{\"q1\": \"Question 1\", \"q2\": \"Question 2\"}}"
    )
}

/// Instruction block for verdict generation.
///
/// The rating scale (1 = poor, 5 = excellent) matches
/// [`crate::job::MIN_RATING`]..=[`crate::job::MAX_RATING`].
pub const VERDICT_INSTRUCTIONS: &str = "Evaluate how well the student understands their own code \
     based on their written answers. Rate the understanding from 1 to 5, \
     where 1 = poor and 5 = excellent. Respond only with a JSON object: \
     {\"rating\": number (int), \"verdict\": \"short explanation, max 20 words (str)\"}";

/// Build the full question-generation prompt: instructions followed by the
/// assembled file content.
pub fn build_questions_prompt(files: &IndexMap<String, String>, question_count: u32) -> String {
    format!(
        "{}\n{}",
        question_instructions(question_count),
        assemble_content(files)
    )
}

/// Build the full verdict prompt: instructions, the submitted code, and the
/// question/answer pairs as JSON objects.
pub fn build_verdict_prompt(
    code: &str,
    questions: &IndexMap<String, String>,
    answers: &IndexMap<String, String>,
) -> String {
    // IndexMap serializes in iteration order, keeping the prompt deterministic.
    let questions_json =
        serde_json::to_string(questions).unwrap_or_else(|_| "{}".to_string());
    let answers_json = serde_json::to_string(answers).unwrap_or_else(|_| "{}".to_string());
    format!(
        "{VERDICT_INSTRUCTIONS}\nCode:\n{code}\nQuestions: {questions_json}\nAnswers: {answers_json}"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
