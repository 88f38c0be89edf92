//! Grounded prompt assembly

/// Fixed refusal string the model is instructed to emit for out-of-scope
/// or unsafe questions.
pub const REFUSAL: &str = "I can't answer this type of question.";

/// Separator between assembled context blocks.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// The grounding instruction: context-only answers, descriptive tone,
/// fixed refusal for anything the context does not cover.
pub fn grounding_instruction() -> String {
    format!(
        "You are a helpful assistant. \
         Answer using ONLY the provided context. \
         You may explain scientific or medical information in a descriptive, factual manner \
         as stated in the context, but do NOT give personal advice, instructions, or recommendations. \
         If the question is irrelevant, violent, or unrelated to the context, respond exactly with: \
         \"{REFUSAL}\" \
         Cite sources by referring to the chunk_id."
    )
}

/// Header identifying one context block's provenance.
pub fn source_header(score: f32, document_id: &str, chunk_id: &str) -> String {
    format!("[Source score={score:.3} doc={document_id} chunk_id={chunk_id}]")
}

/// The user message: question plus assembled context.
pub fn user_message(question: &str, context: &str) -> String {
    format!("QUESTION:\n{question}\n\nCONTEXT:\n{context}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_carries_refusal_string() {
        let instruction = grounding_instruction();
        assert!(instruction.contains(REFUSAL));
        assert!(instruction.contains("ONLY the provided context"));
    }

    #[test]
    fn test_source_header_format() {
        let header = source_header(0.8765, "report", "report-p3-b2-s1");
        assert_eq!(header, "[Source score=0.877 doc=report chunk_id=report-p3-b2-s1]");
    }
}
