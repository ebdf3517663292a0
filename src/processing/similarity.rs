//! TF-IDF text similarity between a resume and a job description

use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimilarityTier {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSimilarity {
    /// Cosine similarity of the TF-IDF vectors, in `[0, 1]`.
    pub score: f32,
    pub tier: SimilarityTier,
    /// Shared terms ordered by their contribution to the score.
    pub shared_terms: Vec<String>,
}

pub struct SimilarityScorer {
    text_processor: TextProcessor,
    strong_threshold: f32,
    moderate_threshold: f32,
}

impl SimilarityScorer {
    pub fn new(strong_threshold: f32, moderate_threshold: f32) -> Self {
        Self {
            text_processor: TextProcessor::new(),
            strong_threshold,
            moderate_threshold,
        }
    }

    /// Compare two documents using TF-IDF weights fitted on the pair.
    ///
    /// Returns `None` when either side has no usable terms.
    pub fn compare(&self, resume_text: &str, job_text: &str) -> Option<TextSimilarity> {
        let resume_counts = term_counts(&self.text_processor.tokenize(resume_text));
        let job_counts = term_counts(&self.text_processor.tokenize(job_text));

        if resume_counts.is_empty() || job_counts.is_empty() {
            return None;
        }

        let vocabulary: BTreeSet<&String> = resume_counts.keys().chain(job_counts.keys()).collect();
        let corpus = [&resume_counts, &job_counts];

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let n = corpus.len() as f32;
        let idf: BTreeMap<&String, f32> = vocabulary
            .iter()
            .map(|term| {
                let df = corpus.iter().filter(|doc| doc.contains_key(*term)).count() as f32;
                (*term, ((1.0 + n) / (1.0 + df)).ln() + 1.0)
            })
            .collect();

        let resume_vector = weigh(&resume_counts, &idf, &vocabulary);
        let job_vector = weigh(&job_counts, &idf, &vocabulary);

        let score = cosine_similarity(&resume_vector, &job_vector).clamp(0.0, 1.0);

        let mut shared: Vec<(f32, &String)> = vocabulary
            .iter()
            .enumerate()
            .filter(|(i, _)| resume_vector[*i] > 0.0 && job_vector[*i] > 0.0)
            .map(|(i, term)| (resume_vector[i] * job_vector[i], *term))
            .collect();
        shared.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        Some(TextSimilarity {
            score,
            tier: self.tier(score),
            shared_terms: shared.into_iter().take(10).map(|(_, term)| term.clone()).collect(),
        })
    }

    pub fn tier(&self, score: f32) -> SimilarityTier {
        if score >= self.strong_threshold {
            SimilarityTier::Strong
        } else if score >= self.moderate_threshold {
            SimilarityTier::Moderate
        } else {
            SimilarityTier::Weak
        }
    }
}

fn term_counts(tokens: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

fn weigh(counts: &BTreeMap<String, usize>, idf: &BTreeMap<&String, f32>, vocabulary: &BTreeSet<&String>) -> Vec<f32> {
    vocabulary
        .iter()
        .map(|term| {
            let tf = counts.get(*term).copied().unwrap_or(0) as f32;
            tf * idf.get(term).copied().unwrap_or(0.0)
        })
        .collect()
}

/// Cosine similarity between two equally sized vectors; 0 when either is all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
