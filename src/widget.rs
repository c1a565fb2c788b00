use crate::document::PublicPost;
use crate::engine::SearchContext;
use crate::index::Indexer;
use anyhow::Result;

/// A key release on the search box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Escape,
    Other(String),
}

/// The control the query text is read from
pub trait SearchInput {
    fn value(&self) -> String;
}

/// Draws a result list into the output region
pub trait Renderer {
    fn render(&mut self, results: &[&PublicPost]) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, results: &[&PublicPost]) -> Result<()> {
        (**self).render(results)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, results: &[&PublicPost]) -> Result<()> {
        (**self).render(results)
    }
}

/// In-memory text box
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    text: String,
}

impl TextInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Edit the text the way a key press would
    pub fn apply(&mut self, key: &Key) {
        match key {
            Key::Char(c) => self.text.push(*c),
            Key::Backspace => {
                self.text.pop();
            }
            Key::Enter | Key::Escape | Key::Other(_) => {}
        }
    }
}

impl SearchInput for TextInput {
    fn value(&self) -> String {
        self.text.clone()
    }
}

/// Search box bound to a result region: every keyup re-queries and re-renders
pub struct SearchWidget<'a, I, N, R> {
    context: &'a SearchContext<I>,
    input: N,
    renderer: R,
}

impl<'a, I, N, R> SearchWidget<'a, I, N, R>
where
    I: Indexer,
    N: SearchInput,
    R: Renderer,
{
    pub fn new(context: &'a SearchContext<I>, input: N, renderer: R) -> Self {
        Self {
            context,
            input,
            renderer,
        }
    }

    /// Keyup handler; fires for every key, printable or not
    pub fn on_keyup(&mut self, key: &Key) -> Result<usize> {
        tracing::debug!(?key, "keyup");
        self.search()
    }

    /// Query with the current input value and render the results
    pub fn search(&mut self) -> Result<usize> {
        let query = self.input.value();
        let results = self.context.search(&query);
        tracing::debug!(query = %query, results = results.len(), "rendering results");
        self.renderer.render(&results)?;
        Ok(results.len())
    }

    pub fn input_mut(&mut self) -> &mut N {
        &mut self.input
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_keys() {
        let mut input = TextInput::default();
        for key in [Key::Char('r'), Key::Char('u'), Key::Char('x'), Key::Backspace, Key::Enter] {
            input.apply(&key);
        }
        assert_eq!(input.value(), "ru");

        input.apply(&Key::Other("ArrowLeft".into()));
        assert_eq!(input.value(), "ru");
    }

    #[test]
    fn test_backspace_on_empty_input() {
        let mut input = TextInput::new("");
        input.apply(&Key::Backspace);
        assert_eq!(input.value(), "");
    }
}
