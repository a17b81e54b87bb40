use schemars::{schema_for, JsonSchema};
use serde_json::Value;

use crate::{
    config::ValidationMode,
    constants::prompts::{
        ESSAY_FORMAT, KEYWORD_VERDICT_INSTRUCTION, MULTIPLE_CHOICE_FORMAT, QUESTION_TOOL_NAME,
        STRUCTURED_OUTPUT_INSTRUCTION, STRUCTURED_VERDICT_INSTRUCTION, VERDICT_TOOL_NAME,
    },
    models::{
        domain::{ExamRequest, QuestionType},
        dto::generation::{EssaySet, MultipleChoiceSet, VerdictPayload},
    },
    services::completion_client::ToolDefinition,
};

/// Everything the generation prompt is built from.
#[derive(Debug, Clone)]
pub struct PromptInput<'a> {
    pub subject: &'a str,
    pub level: &'a str,
    pub count: u32,
    pub question_type: QuestionType,
    pub context: Option<&'a str>,
    /// Questions already accepted in this request.
    pub avoid: &'a [String],
    pub max_context_chars: usize,
    pub structured: bool,
}

impl<'a> PromptInput<'a> {
    pub fn from_request(request: &'a ExamRequest, count: u32, max_context_chars: usize) -> Self {
        PromptInput {
            subject: &request.subject,
            level: &request.level,
            count,
            question_type: request.question_type,
            context: request.context.as_deref(),
            avoid: &[],
            max_context_chars,
            structured: false,
        }
    }

    pub fn avoiding(mut self, avoid: &'a [String]) -> Self {
        self.avoid = avoid;
        self
    }

    pub fn structured(mut self, structured: bool) -> Self {
        self.structured = structured;
        self
    }
}

/// Cuts `text` to at most `max_chars` characters without splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn build_generation_prompt(input: &PromptInput<'_>) -> String {
    let mut prompt = match input.question_type {
        QuestionType::MultipleChoice => format!(
            "Buatkan {} soal ujian tingkat {} untuk mata pelajaran {} dalam Bahasa Indonesia, \
             dalam bentuk pilihan ganda dengan 4 pilihan jawaban (A sampai D). \
             Pastikan hanya ada satu jawaban yang benar dan soalnya benar serta sesuai.",
            input.count, input.level, input.subject
        ),
        QuestionType::Essay => format!(
            "Buatkan {} soal ujian tingkat {} untuk mata pelajaran {} dalam Bahasa Indonesia, \
             dalam bentuk soal esai yang membutuhkan jawaban singkat. \
             Sertakan jawaban acuan dan rubrik penilaian untuk setiap soal.",
            input.count, input.level, input.subject
        ),
    };

    if let Some(context) = input.context.map(str::trim).filter(|c| !c.is_empty()) {
        let excerpt = truncate_chars(context, input.max_context_chars);
        if excerpt.len() < context.len() {
            log::info!(
                "Context truncated to {} characters for prompt",
                input.max_context_chars
            );
        }
        prompt.push_str(
            "\n\nSusun soal hanya berdasarkan teks sumber berikut:\n\"\"\"\n",
        );
        prompt.push_str(excerpt);
        prompt.push_str("\n\"\"\"");
    }

    if !input.avoid.is_empty() {
        prompt.push_str("\n\nJangan mengulang soal yang sudah dibuat berikut:");
        for previous in input.avoid {
            prompt.push_str("\n- ");
            prompt.push_str(previous);
        }
    }

    prompt.push_str("\n\n");
    if input.structured {
        prompt.push_str(STRUCTURED_OUTPUT_INSTRUCTION);
    } else {
        prompt.push_str(match input.question_type {
            QuestionType::MultipleChoice => MULTIPLE_CHOICE_FORMAT,
            QuestionType::Essay => ESSAY_FORMAT,
        });
    }

    prompt
}

/// Asks the model to judge one generated question. It is never asked to
/// rewrite the question.
pub fn build_validation_prompt(
    request: &ExamRequest,
    generated: &str,
    mode: ValidationMode,
) -> String {
    let instruction = match mode {
        ValidationMode::Keyword => KEYWORD_VERDICT_INSTRUCTION,
        ValidationMode::Structured => STRUCTURED_VERDICT_INSTRUCTION,
    };

    format!(
        "Berikut adalah soal {} tingkat {} untuk mata pelajaran {} beserta jawabannya:\n\n{}\n\n\
         Tolong periksa apakah soal dan jawabannya sudah benar dan sesuai. {}",
        request.question_type.label(),
        request.level,
        request.subject,
        generated.trim(),
        instruction
    )
}

fn tool_parameters<T: JsonSchema>() -> Value {
    let mut schema = schema_for!(T).to_value();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    schema
}

pub fn build_question_tool(question_type: QuestionType) -> ToolDefinition {
    let (description, parameters) = match question_type {
        QuestionType::MultipleChoice => (
            "Kirim daftar soal pilihan ganda beserta pilihan, huruf kunci jawaban, dan penjelasan.",
            tool_parameters::<MultipleChoiceSet>(),
        ),
        QuestionType::Essay => (
            "Kirim daftar soal esai beserta jawaban acuan dan rubrik penilaian.",
            tool_parameters::<EssaySet>(),
        ),
    };

    ToolDefinition {
        name: QUESTION_TOOL_NAME.to_string(),
        description: description.to_string(),
        parameters,
    }
}

pub fn build_verdict_tool() -> ToolDefinition {
    ToolDefinition {
        name: VERDICT_TOOL_NAME.to_string(),
        description: "Kirim hasil validasi soal: accept atau reject beserta alasannya."
            .to_string(),
        parameters: tool_parameters::<VerdictPayload>(),
    }
}
