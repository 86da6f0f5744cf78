//! Prompts for completion-backed entity recognition and affect classification.
//!
//! Replies are expected as a single JSON object; see [`crate::parse_ner_output`]
//! and [`crate::parse_affect_output`].

/// System prompt for clinical NER.
pub const SYSTEM_PROMPT: &str = r#"You are a clinical documentation assistant that extracts medical entities from doctor-patient conversation transcripts.

Label each entity with exactly one category:
- DISEASE: diseases, injuries, disorders and symptoms (e.g. whiplash, concussion, back pain, headache)
- CHEMICAL: drugs and chemical substances (e.g. ibuprofen, paracetamol, codeine)

Only report spans that appear verbatim in the transcript.

Output JSON with an "entities" array containing the extracted entities."#;

/// User prompt template for NER extraction.
pub fn make_extraction_prompt(transcript: &str) -> String {
    format!(
        r#"Extract all DISEASE and CHEMICAL entities from this clinical transcript:

"{}"

Return a JSON object with an "entities" array. Each entity should have:
- text: The exact span as written in the transcript
- label: DISEASE or CHEMICAL
- start_offset: Character position where the span starts (null if unsure)
- end_offset: Character position where the span ends (null if unsure)"#,
        transcript
    )
}

/// Example few-shot prompts for better extraction accuracy.
pub const FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    (
        "The doctor said it was a whiplash injury and gave me ibuprofen.",
        r#"{"entities":[{"text":"whiplash injury","label":"DISEASE","start_offset":25,"end_offset":40},{"text":"ibuprofen","label":"CHEMICAL","start_offset":53,"end_offset":62}]}"#,
    ),
    (
        "I still get headaches at night, but no dizziness.",
        r#"{"entities":[{"text":"headaches","label":"DISEASE","start_offset":12,"end_offset":21},{"text":"dizziness","label":"DISEASE","start_offset":39,"end_offset":48}]}"#,
    ),
    (
        "We'll check you again in two weeks.",
        r#"{"entities":[]}"#,
    ),
];

/// Build a complete NER prompt with system context and optional few-shot examples.
pub fn build_full_prompt(transcript: &str, include_examples: bool) -> String {
    let mut prompt = String::new();

    // System context
    prompt.push_str("<|system|>\n");
    prompt.push_str(SYSTEM_PROMPT);
    prompt.push_str("\n<|end|>\n");

    // Few-shot examples
    if include_examples {
        for (input, output) in FEW_SHOT_EXAMPLES {
            prompt.push_str("<|user|>\n");
            prompt.push_str(&make_extraction_prompt(input));
            prompt.push_str("\n<|end|>\n");
            prompt.push_str("<|assistant|>\n");
            prompt.push_str(output);
            prompt.push_str("\n<|end|>\n");
        }
    }

    // Actual request
    prompt.push_str("<|user|>\n");
    prompt.push_str(&make_extraction_prompt(transcript));
    prompt.push_str("\n<|end|>\n");
    prompt.push_str("<|assistant|>\n");

    prompt
}

/// System prompt for patient affect classification.
pub const AFFECT_SYSTEM_PROMPT: &str = r#"You classify the emotional polarity of a single patient statement from a medical consultation.

Answer with a JSON object {"label": "POSITIVE" | "NEGATIVE" | "NEUTRAL", "confidence": <0.0-1.0>}."#;

/// Build a complete affect classification prompt.
pub fn build_affect_prompt(statement: &str) -> String {
    format!(
        "<|system|>\n{}\n<|end|>\n<|user|>\nStatement: \"{}\"\n<|end|>\n<|assistant|>\n",
        AFFECT_SYSTEM_PROMPT, statement
    )
}
