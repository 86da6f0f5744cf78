//! Lightweight text segmentation for transcripts.
//!
//! Provides the two segmentations the clinical extractor needs:
//! - Sentence splitting (terminal punctuation followed by whitespace)
//! - Noun-phrase-like chunks (word runs between function words)

/// Titles whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &["mr", "mrs", "ms", "dr", "st", "vs", "etc"];

/// Longest chunk kept; longer runs keep their trailing words (the head noun).
const MAX_CHUNK_WORDS: usize = 4;

/// Words that never appear inside a noun chunk.
const BREAK_WORDS: &[&str] = &[
    // Determiners and possessives
    "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its",
    "our", "their", "some", "any", "no", "every", "each", "all", "much", "many",
    // Pronouns
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "what", "which",
    "who", "whom", "anything", "something", "nothing", "everything",
    // Auxiliaries and common verbs
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "can", "could", "will", "would", "shall", "should", "may", "might",
    "must", "get", "got", "go", "went", "feel", "felt", "take", "took", "need", "needed",
    "see", "saw", "seem", "seems", "hurt", "hurts", "hit", "say", "said", "think", "know",
    "let", "make", "made", "come", "came", "keep", "kept", "notice", "noticed", "expect",
    "recommend", "recommended", "stopped", "started", "helped", "happened",
    // Prepositions
    "of", "in", "on", "at", "for", "with", "to", "from", "about", "after", "before",
    "since", "during", "within", "into", "over", "under", "around", "through", "by", "as",
    "like", "than", "off", "out", "up", "down",
    // Conjunctions
    "and", "or", "but", "so", "because", "if", "when", "while", "though", "although",
    // Adverbs and fillers
    "not", "very", "really", "just", "still", "now", "then", "also", "only", "too",
    "quite", "pretty", "well", "actually", "again", "even", "ever", "never", "yes", "no",
    "yeah", "okay", "ok", "oh", "um", "uh", "there", "here", "how", "where", "why",
];

/// Split text into trimmed sentences.
///
/// A sentence ends at `.`, `!` or `?` (runs of them are kept together) followed by
/// whitespace or end of input. A period after a title abbreviation does not split.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        // Keep "?!" and "..." together
        while let Some(&next) = chars.peek() {
            if matches!(next, '.' | '!' | '?') {
                current.push(next);
                chars.next();
            } else {
                break;
            }
        }

        let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
        if at_boundary && !(c == '.' && ends_with_abbreviation(&current)) {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }

    push_trimmed(&mut sentences, &current);
    sentences
}

/// Extract noun-phrase-like chunks: maximal word runs bounded by punctuation
/// and function words, in order of appearance.
pub fn noun_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for segment in text.split(|c: char| !(c.is_alphanumeric() || c.is_whitespace() || c == '-' || c == '\'')) {
        for raw in segment.split_whitespace() {
            let word = raw.trim_matches(|c: char| c == '\'' || c == '-');
            if word.is_empty() || is_break_word(word) {
                flush_chunk(&mut chunks, &mut run);
            } else {
                run.push(word);
            }
        }
        flush_chunk(&mut chunks, &mut run);
    }

    chunks
}

fn is_break_word(word: &str) -> bool {
    let lower = word.to_lowercase();

    // Contractions: "didn't", "I'm", "we'll", ...
    if let Some((_, suffix)) = lower.rsplit_once('\'') {
        if matches!(suffix, "t" | "m" | "re" | "ve" | "ll" | "d") {
            return true;
        }
    }

    BREAK_WORDS.contains(&lower.as_str())
}

fn flush_chunk(chunks: &mut Vec<String>, run: &mut Vec<&str>) {
    if run.is_empty() {
        return;
    }
    let start = run.len().saturating_sub(MAX_CHUNK_WORDS);
    chunks.push(run[start..].join(" "));
    run.clear();
}

fn ends_with_abbreviation(sentence: &str) -> bool {
    let body = sentence.trim_end_matches('.');
    let last_word = body
        .rsplit(|c: char| !c.is_alphabetic())
        .next()
        .unwrap_or("");
    ABBREVIATIONS.contains(&last_word.to_lowercase().as_str())
}

fn push_trimmed(sentences: &mut Vec<String>, sentence: &str) {
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
