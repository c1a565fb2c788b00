use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use postsearch::{
    api, JsonRenderer, Key, PostCollection, Renderer, SearchContext, SearchWidget,
    TerminalRenderer, TextInput,
};
use std::io::{self, BufRead};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Full-text search over static-site posts", long_about = None)]
struct Args {
    /// Post data (.json or .xml, optionally .gz)
    #[arg(short, long, default_value = "data/posts.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one query and print the results
    Search {
        query: String,

        /// Print the render payload as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Each stdin line replaces the search box text and fires a keyup
    Interactive {
        #[arg(long)]
        json: bool,
    },
    /// Serve the search over HTTP for previewing a site
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:4000")]
        addr: SocketAddr,
    },
    /// Print index statistics
    Stats,
}

fn renderer(json: bool) -> Box<dyn Renderer> {
    if json {
        Box::new(JsonRenderer::new(io::stdout()))
    } else {
        Box::new(TerminalRenderer::new(io::stdout()))
    }
}

fn interactive(context: &SearchContext, json: bool) -> Result<()> {
    let mut widget = SearchWidget::new(context, TextInput::default(), renderer(json));

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read search input")?;
        widget.input_mut().set(line);
        widget.on_keyup(&Key::Enter)?;
    }

    Ok(())
}

async fn serve(context: SearchContext, addr: SocketAddr) -> Result<()> {
    let app = api::create_router(Arc::new(context));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("postsearch=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let posts = PostCollection::load(&args.data)
        .with_context(|| format!("Failed to load posts from {}", args.data.display()))?;
    let context = SearchContext::new(posts);

    match args.command {
        Command::Search { query, json } => {
            let mut widget = SearchWidget::new(&context, TextInput::new(query), renderer(json));
            widget.search()?;
        }
        Command::Interactive { json } => interactive(&context, json)?,
        Command::Serve { addr } => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(serve(context, addr))?;
        }
        Command::Stats => {
            let stats = context.index().stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
