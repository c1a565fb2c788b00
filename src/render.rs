use crate::document::PublicPost;
use crate::widget::Renderer;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct RenderProps<'a> {
    data: &'a [&'a PublicPost],
}

/// Writes one `{"data": [...]}` object per render, newline-delimited
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, results: &[&PublicPost]) -> Result<()> {
        serde_json::to_writer(&mut self.out, &RenderProps { data: results })
            .context("Failed to serialize search results")?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Plain-text result list for a terminal
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, results: &[&PublicPost]) -> Result<()> {
        if results.is_empty() {
            writeln!(self.out, "(no results)")?;
        }

        for post in results {
            write!(self.out, "{}", post.title)?;
            if !post.category.is_empty() {
                write!(self.out, "  [{}]", post.category)?;
            }
            if !post.tags.is_empty() {
                write!(self.out, "  #{}", post.tags)?;
            }
            if let Some(url) = post.extra.get("url").and_then(|v| v.as_str()) {
                write!(self.out, "  {}", url)?;
            }
            writeln!(self.out)?;
        }

        self.out.flush()?;
        Ok(())
    }
}
