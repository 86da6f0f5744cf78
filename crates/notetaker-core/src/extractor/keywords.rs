//! Keyword ranking and extractive summarization.

use std::collections::HashMap;

use notetaker_nlp::text::{noun_chunks, split_sentences};
use notetaker_nlp::Entity;

use crate::models::Transcript;

/// Rank keyword candidates: recognized entity spans, then noun chunks that
/// contain one of `terms`.
///
/// Candidates are grouped by exact spelling, ordered by frequency with ties
/// in first-seen order, and truncated to `limit`.
pub fn rank_keywords(entities: &[Entity], text: &str, terms: &[String], limit: usize) -> Vec<String> {
    let chunks = noun_chunks(text);
    let candidates = entities.iter().map(|e| e.text.as_str()).chain(
        chunks
            .iter()
            .map(String::as_str)
            .filter(|chunk| {
                let lower = chunk.to_lowercase();
                terms.iter().any(|term| lower.contains(term.as_str()))
            }),
    );

    // (surface form, count) in first-seen order
    let mut ranked: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for candidate in candidates {
        match index.get(candidate) {
            Some(&i) => ranked[i].1 += 1,
            None => {
                index.insert(candidate, ranked.len());
                ranked.push((candidate.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(keyword, _)| keyword).collect()
}

/// Extractive summary: the `limit` highest-scoring sentences from Patient and
/// Physician turns, where a sentence scores one point per term it contains.
///
/// Sentences scoring zero are dropped; ties keep transcript order.
pub fn extractive_summary(transcript: &Transcript, terms: &[String], limit: usize) -> String {
    let mut scored: Vec<(usize, String)> = transcript
        .turns()
        .iter()
        .filter(|turn| turn.speaker.is_known())
        .flat_map(|turn| split_sentences(&turn.text))
        .filter_map(|sentence| {
            let lower = sentence.to_lowercase();
            let score = terms.iter().filter(|term| lower.contains(term.as_str())).count();
            (score > 0).then_some((score, sentence))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, sentence)| sentence)
        .collect::<Vec<_>>()
        .join(" ")
}
