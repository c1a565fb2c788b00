use crate::document::PublicPost;
use crate::index::{Indexer, InvertedIndex};
use crate::loader::PostCollection;
use std::collections::HashMap;
use std::time::Instant;

/// Built search state: the index plus the content-free post records
pub struct SearchContext<I = InvertedIndex> {
    index: I,
    posts: HashMap<String, PublicPost>,
}

impl SearchContext<InvertedIndex> {
    /// Build with the default inverted index
    pub fn new(posts: PostCollection) -> Self {
        Self::build(posts, InvertedIndex::new())
    }
}

impl<I: Indexer> SearchContext<I> {
    /// Index every post, then keep only its public projection
    pub fn build(posts: PostCollection, mut index: I) -> Self {
        let start = Instant::now();
        let mut public = HashMap::with_capacity(posts.len());

        for post in posts.into_posts() {
            index.add(&post);
            public.insert(post.id.clone(), PublicPost::from(post));
        }

        tracing::info!(posts = public.len(), elapsed = ?start.elapsed(), "search index built");

        Self { index, posts: public }
    }

    /// Run a query; results keep the index's order
    pub fn search(&self, query: &str) -> Vec<&PublicPost> {
        let hits = self.index.search(query);
        if hits.is_empty() {
            return Vec::new();
        }

        hits.iter()
            .filter_map(|hit| {
                let post = self.posts.get(&hit.reference);
                if post.is_none() {
                    tracing::warn!(reference = %hit.reference, "search hit has no matching post");
                }
                post
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&PublicPost> {
        self.posts.get(id)
    }

    pub fn posts(&self) -> impl Iterator<Item = &PublicPost> {
        self.posts.values()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn index(&self) -> &I {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Post;
    use crate::ranking::SearchHit;

    /// Returns a fixed hit list regardless of the query
    struct ScriptedIndex {
        added: Vec<String>,
        hits: Vec<SearchHit>,
    }

    impl Indexer for ScriptedIndex {
        fn add(&mut self, post: &Post) {
            self.added.push(post.id.clone());
        }

        fn search(&self, _query: &str) -> Vec<SearchHit> {
            self.hits.clone()
        }
    }

    fn posts() -> PostCollection {
        ["a", "b", "c"]
            .into_iter()
            .map(|id| Post::new(id, id.to_uppercase()).with_content("secret"))
            .collect()
    }

    #[test]
    fn test_every_post_is_indexed() {
        let index = ScriptedIndex {
            added: Vec::new(),
            hits: Vec::new(),
        };
        let context = SearchContext::build(posts(), index);

        let mut added = context.index().added.clone();
        added.sort();
        assert_eq!(added, vec!["a", "b", "c"]);
        assert_eq!(context.len(), 3);
    }

    #[test]
    fn test_results_follow_hit_order() {
        let index = ScriptedIndex {
            added: Vec::new(),
            hits: vec![
                SearchHit::new("c".into(), 0.1),
                SearchHit::new("a".into(), 0.9),
                SearchHit::new("b".into(), 0.5),
            ],
        };
        let context = SearchContext::build(posts(), index);

        let ids: Vec<&str> = context.search("anything").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_dangling_references_are_skipped() {
        let index = ScriptedIndex {
            added: Vec::new(),
            hits: vec![SearchHit::new("zzz".into(), 1.0), SearchHit::new("a".into(), 0.5)],
        };
        let context = SearchContext::build(posts(), index);

        let ids: Vec<&str> = context.search("x").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_stored_posts_have_no_content() -> anyhow::Result<()> {
        let context = SearchContext::new(posts());
        for post in context.posts() {
            let json = serde_json::to_value(post)?;
            assert!(json.get("content").is_none());
        }
        Ok(())
    }
}
