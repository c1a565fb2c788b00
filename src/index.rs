use crate::document::{DocStats, Field, FieldCounts, Post};
use crate::ranking::{rank_documents, similarity_boost, Bm25F, SearchHit};
use crate::tokenizer::Tokenizer;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;

/// Full-text indexing capability used by the search context
pub trait Indexer {
    /// Index a post under its `id`
    fn add(&mut self, post: &Post);

    /// Query the index; hits come back best first
    fn search(&self, query: &str) -> Vec<SearchHit>;
}

/// Inverted index: term -> document -> per-field term frequency
pub struct InvertedIndex {
    postings: BTreeMap<String, HashMap<String, FieldCounts>>,
    doc_stats: HashMap<String, DocStats>,
    total_field_lengths: FieldCounts,
    tokenizer: Tokenizer,
    scorer: Bm25F,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self {
            postings: BTreeMap::new(),
            doc_stats: HashMap::new(),
            total_field_lengths: [0; Field::COUNT],
            tokenizer: Tokenizer::new(),
            scorer: Bm25F::default(),
        }
    }

    fn remove_document(&mut self, doc_id: &str) {
        let Some(stats) = self.doc_stats.remove(doc_id) else {
            return;
        };

        for (total, length) in self.total_field_lengths.iter_mut().zip(stats.field_lengths) {
            *total -= length;
        }
        for docs in self.postings.values_mut() {
            docs.remove(doc_id);
        }
        self.postings.retain(|_, docs| !docs.is_empty());
    }

    /// Indexed terms starting with `prefix`, in lexical order
    fn expand<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a HashMap<String, FieldCounts>)> + 'a {
        self.postings
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(term, _)| term.starts_with(prefix))
    }

    /// Per-field frequencies of a term in one document
    pub fn field_frequencies(&self, term: &str, doc_id: &str) -> Option<&FieldCounts> {
        self.postings.get(term).and_then(|docs| docs.get(doc_id))
    }

    /// Number of documents containing a term (for IDF calculation)
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashMap::len)
    }

    pub fn doc_stats(&self, doc_id: &str) -> Option<&DocStats> {
        self.doc_stats.get(doc_id)
    }

    pub fn total_documents(&self) -> usize {
        self.doc_stats.len()
    }

    pub fn avg_field_length(&self, field: Field) -> f64 {
        if self.doc_stats.is_empty() {
            return 0.0;
        }
        self.total_field_lengths[field.slot()] as f64 / self.doc_stats.len() as f64
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_documents: self.doc_stats.len(),
            total_terms: self.postings.len(),
            avg_docs_per_term: if self.postings.is_empty() {
                0.0
            } else {
                self.postings.values().map(HashMap::len).sum::<usize>() as f64 / self.postings.len() as f64
            },
        }
    }
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Indexer for InvertedIndex {
    fn add(&mut self, post: &Post) {
        if self.doc_stats.contains_key(&post.id) {
            tracing::debug!(id = %post.id, "replacing previously indexed post");
            self.remove_document(&post.id);
        }

        let mut stats = DocStats::new(post.id.clone());
        for field in Field::ALL {
            let frequencies = self.tokenizer.analyze_with_frequencies(post.field(field));
            let length: usize = frequencies.values().sum();
            stats.field_lengths[field.slot()] = length;
            self.total_field_lengths[field.slot()] += length;

            for (term, count) in frequencies {
                let counts = self
                    .postings
                    .entry(term)
                    .or_default()
                    .entry(post.id.clone())
                    .or_insert([0; Field::COUNT]);
                counts[field.slot()] += count;
            }
        }

        self.doc_stats.insert(post.id.clone(), stats);
    }

    fn search(&self, query: &str) -> Vec<SearchHit> {
        let query_tokens = self.tokenizer.analyze(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        // Every query token must match; any of its expansions will do
        let mut candidates: Option<HashSet<&str>> = None;
        let mut terms: Vec<(&str, f64)> = Vec::new();

        for token in &query_tokens {
            let mut matched: HashSet<&str> = HashSet::new();
            for (term, docs) in self.expand(token) {
                terms.push((term.as_str(), similarity_boost(token, term)));
                matched.extend(docs.keys().map(String::as_str));
            }

            let narrowed = match candidates {
                None => matched,
                Some(previous) => previous.intersection(&matched).copied().collect(),
            };
            if narrowed.is_empty() {
                return Vec::new();
            }
            candidates = Some(narrowed);
        }

        let hits = rank_documents(&terms, candidates.unwrap_or_default(), self, &self.scorer);
        tracing::debug!(query, tokens = query_tokens.len(), hits = hits.len(), "index searched");
        hits
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_terms: usize,
    pub avg_docs_per_term: f64,
}
