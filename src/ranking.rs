use crate::document::{DocStats, Field};
use crate::index::InvertedIndex;
use serde::Serialize;
use std::cmp::Ordering;

/// Term frequency saturation
pub const K1: f64 = 1.2;
/// Field length normalization
pub const B: f64 = 0.75;

/// Relevance multiplier for matches in a field
pub const fn field_weight(field: Field) -> f64 {
    match field {
        Field::Title => 10.0,
        Field::Category => 8.0,
        Field::Tags => 5.0,
        Field::Content => 1.0,
    }
}

/// BM25F: BM25 over a weighted sum of per-field term frequencies
#[derive(Debug, Clone, Copy)]
pub struct Bm25F {
    k1: f64,
    b: f64,
}

impl Default for Bm25F {
    fn default() -> Self {
        Self { k1: K1, b: B }
    }
}

impl Bm25F {
    /// Score one document against expanded query terms and their boosts
    pub fn score(&self, terms: &[(&str, f64)], doc_stats: &DocStats, index: &InvertedIndex) -> f64 {
        let total_docs = index.total_documents() as f64;
        let mut score = 0.0;

        for &(term, boost) in terms {
            let Some(counts) = index.field_frequencies(term, &doc_stats.id) else {
                continue;
            };

            let mut weighted_tf = 0.0;
            for field in Field::ALL {
                let tf = counts[field.slot()] as f64;
                if tf == 0.0 {
                    continue;
                }

                let avg_length = index.avg_field_length(field);
                let length = doc_stats.field_length(field) as f64;
                let norm = if avg_length > 0.0 {
                    1.0 - self.b + self.b * (length / avg_length)
                } else {
                    1.0
                };

                weighted_tf += field_weight(field) * tf / norm;
            }

            if weighted_tf == 0.0 {
                continue;
            }

            let doc_freq = index.doc_frequency(term) as f64;
            let idf = ((total_docs - doc_freq + 0.5) / (doc_freq + 0.5) + 1.0).ln();

            score += boost * idf * (weighted_tf * (self.k1 + 1.0)) / (weighted_tf + self.k1);
        }

        score
    }
}

/// Damping for an indexed term reached by prefix expansion of a query token
pub fn similarity_boost(query_token: &str, term: &str) -> f64 {
    if term == query_token {
        return 1.0;
    }
    let extra = term.chars().count().saturating_sub(query_token.chars().count());
    1.0 / (extra.max(3) as f64).ln()
}

/// One query result: a document reference and its relevance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub reference: String,
    pub score: f64,
}

impl SearchHit {
    pub fn new(reference: String, score: f64) -> Self {
        Self { reference, score }
    }
}

/// Rank candidate documents, best first
pub fn rank_documents<'a>(
    terms: &[(&str, f64)],
    candidates: impl IntoIterator<Item = &'a str>,
    index: &InvertedIndex,
    scorer: &Bm25F,
) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter_map(|doc_id| index.doc_stats(doc_id))
        .map(|stats| SearchHit::new(stats.id.clone(), scorer.score(terms, stats, index)))
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.reference.cmp(&b.reference))
    });

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Post;
    use crate::index::Indexer;

    #[test]
    fn test_title_outweighs_content() {
        let mut index = InvertedIndex::new();
        index.add(&Post::new("a", "rust notes"));
        index.add(&Post::new("b", "cooking notes").with_content("rust stains"));

        let scorer = Bm25F::default();
        let terms = [("rust", 1.0)];
        let a = scorer.score(&terms, index.doc_stats("a").unwrap(), &index);
        let b = scorer.score(&terms, index.doc_stats("b").unwrap(), &index);

        assert!(a > b);
        assert!(b > 0.0);
    }

    #[test]
    fn test_field_weights_order_single_field_matches() {
        let mut index = InvertedIndex::new();
        index.add(&Post::new("title", "rust"));
        index.add(&Post::new("category", "x").with_category("rust"));
        index.add(&Post::new("tags", "x").with_tags("rust"));
        index.add(&Post::new("content", "x").with_content("rust"));

        let hits = rank_documents(
            &[("rust", 1.0)],
            ["content", "tags", "category", "title"],
            &index,
            &Bm25F::default(),
        );
        let refs: Vec<&str> = hits.iter().map(|h| h.reference.as_str()).collect();

        assert_eq!(refs, vec!["title", "category", "tags", "content"]);
        assert!(hits.iter().all(|h| h.score > 0.0));
    }

    #[test]
    fn test_repeated_title_term_never_scores_lower() {
        let mut index = InvertedIndex::new();
        index.add(&Post::new("many", vec!["rust"; 12].join(" ")));
        index.add(&Post::new("one", "rust"));

        let scorer = Bm25F::default();
        let terms = [("rust", 1.0)];
        let many = scorer.score(&terms, index.doc_stats("many").unwrap(), &index);
        let one = scorer.score(&terms, index.doc_stats("one").unwrap(), &index);

        assert!(many >= one);
    }

    #[test]
    fn test_similarity_boost() {
        assert_eq!(similarity_boost("rust", "rust"), 1.0);
        assert!(similarity_boost("ru", "rust") < 1.0);
        assert!(similarity_boost("r", "rustacean") < similarity_boost("ru", "rust"));
    }

    #[test]
    fn test_rank_ties_break_on_reference() {
        let mut index = InvertedIndex::new();
        index.add(&Post::new("b", "rust"));
        index.add(&Post::new("a", "rust"));

        let hits = rank_documents(&[("rust", 1.0)], ["b", "a"], &index, &Bm25F::default());
        let refs: Vec<&str> = hits.iter().map(|h| h.reference.as_str()).collect();

        assert_eq!(refs, vec!["a", "b"]);
    }
}
