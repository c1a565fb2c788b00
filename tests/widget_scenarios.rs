use postsearch::{
    Indexer, Key, PostCollection, PublicPost, Renderer, Result, SearchContext, SearchWidget,
    TextInput,
};
use serde_json::{json, Value};

/// Keeps every rendered list as JSON
#[derive(Default)]
struct RecordingRenderer {
    renders: Vec<Vec<Value>>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, results: &[&PublicPost]) -> Result<()> {
        let rendered = results
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<_, _>>()?;
        self.renders.push(rendered);
        Ok(())
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&mut self, _results: &[&PublicPost]) -> Result<()> {
        anyhow::bail!("results container is gone")
    }
}

fn site() -> Result<SearchContext> {
    let posts = PostCollection::from_json_str(
        r#"[
            {"id": "p1", "title": "Rust Internals", "category": "systems",
             "tags": "rust,memory", "content": "Ownership, borrowing and the borrow checker."},
            {"id": "p2", "title": "Sourdough Starter Notes", "category": "kitchen",
             "tags": "baking,bread", "content": "Flour and water, fed daily."},
            {"id": "p3", "title": "Writing a Memory Allocator", "category": "systems",
             "tags": "c,allocators", "content": "Free lists and size classes."}
        ]"#,
    )?;
    Ok(SearchContext::new(posts))
}

fn ids(context: &SearchContext, query: &str) -> Vec<String> {
    context.search(query).iter().map(|p| p.id.clone()).collect()
}

#[test]
fn rust_query_renders_post_without_content() -> Result<()> {
    let context = site()?;
    let mut recorder = RecordingRenderer::default();

    SearchWidget::new(&context, TextInput::new("Rust"), &mut recorder).search()?;

    assert_eq!(
        recorder.renders,
        vec![vec![json!({
            "id": "p1",
            "title": "Rust Internals",
            "category": "systems",
            "tags": "rust,memory"
        })]]
    );
    Ok(())
}

#[test]
fn empty_query_renders_empty_list() -> Result<()> {
    let context = site()?;
    let mut recorder = RecordingRenderer::default();

    let found = SearchWidget::new(&context, TextInput::default(), &mut recorder).search()?;

    assert_eq!(found, 0);
    assert_eq!(recorder.renders, vec![Vec::<Value>::new()]);
    Ok(())
}

#[test]
fn unknown_word_yields_empty_list() -> Result<()> {
    let context = site()?;
    assert!(ids(&context, "quaternion").is_empty());
    Ok(())
}

#[test]
fn title_category_and_tag_words_find_their_post() -> Result<()> {
    let context = site()?;

    assert!(ids(&context, "Sourdough").contains(&"p2".to_string()));
    assert!(ids(&context, "kitchen").contains(&"p2".to_string()));
    assert!(ids(&context, "allocators").contains(&"p3".to_string()));
    assert!(ids(&context, "memory").contains(&"p1".to_string()));
    assert!(ids(&context, "memory").contains(&"p3".to_string()));
    Ok(())
}

#[test]
fn stopword_only_fields_cannot_be_found() -> Result<()> {
    let posts = PostCollection::from_json_str(
        r#"[{"id": "who", "title": "The Who", "category": "music", "tags": "it"}]"#,
    )?;
    let context = SearchContext::new(posts);

    assert!(ids(&context, "The Who").is_empty());
    assert!(ids(&context, "it").is_empty());
    assert_eq!(ids(&context, "music"), vec!["who".to_string()]);
    Ok(())
}

#[test]
fn result_order_matches_raw_index_order() -> Result<()> {
    let context = site()?;
    let raw: Vec<String> = context
        .index()
        .search("memory systems")
        .into_iter()
        .map(|hit| hit.reference)
        .collect();

    assert_eq!(raw.len(), 2);
    assert_eq!(ids(&context, "memory systems"), raw);
    Ok(())
}

#[test]
fn every_keyup_renders_the_latest_query() -> Result<()> {
    let context = site()?;
    let mut recorder = RecordingRenderer::default();
    let mut widget = SearchWidget::new(&context, TextInput::default(), &mut recorder);

    widget.input_mut().set("bread");
    widget.on_keyup(&Key::Char('d'))?;
    widget.input_mut().set("allocator");
    widget.on_keyup(&Key::Char('r'))?;
    drop(widget);

    assert_eq!(recorder.renders.len(), 2);
    assert_eq!(recorder.renders[0][0]["id"], "p2");
    assert_eq!(recorder.renders[1].len(), 1);
    assert_eq!(recorder.renders[1][0]["id"], "p3");
    Ok(())
}

#[test]
fn non_printing_keys_still_query() -> Result<()> {
    let context = site()?;
    let mut recorder = RecordingRenderer::default();
    let mut widget = SearchWidget::new(&context, TextInput::new("rust"), &mut recorder);

    widget.on_keyup(&Key::Other("Shift".into()))?;
    widget.on_keyup(&Key::Escape)?;
    drop(widget);

    assert_eq!(recorder.renders.len(), 2);
    assert_eq!(recorder.renders[0], recorder.renders[1]);
    Ok(())
}

#[test]
fn typing_narrows_results_per_keystroke() -> Result<()> {
    let context = site()?;
    let mut recorder = RecordingRenderer::default();
    let mut widget = SearchWidget::new(&context, TextInput::default(), &mut recorder);

    for c in "mem".chars() {
        let key = Key::Char(c);
        widget.input_mut().apply(&key);
        widget.on_keyup(&key)?;
    }
    drop(widget);

    // "me" alone is a stopword; "mem" expands to "memory"
    assert_eq!(recorder.renders.len(), 3);
    let last: Vec<&Value> = recorder.renders[2].iter().map(|p| &p["id"]).collect();
    assert_eq!(last.len(), 2);
    assert!(last.contains(&&json!("p1")));
    assert!(last.contains(&&json!("p3")));
    Ok(())
}

#[test]
fn render_errors_propagate() -> Result<()> {
    let context = site()?;
    let mut widget = SearchWidget::new(&context, TextInput::new("rust"), FailingRenderer);

    let err = widget.on_keyup(&Key::Enter).unwrap_err();
    assert!(err.to_string().contains("results container"));
    Ok(())
}
