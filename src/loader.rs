use crate::document::Post;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading post data
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON post data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML post data: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("unsupported post data format: {0}")]
    UnsupportedFormat(PathBuf),
}

/// Embedded JSON is either a list of posts or an object keyed by id
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPosts {
    List(Vec<Post>),
    Keyed(HashMap<String, Post>),
}

#[derive(Debug, Deserialize)]
struct XmlPost {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl From<XmlPost> for Post {
    fn from(raw: XmlPost) -> Self {
        let mut post = Post::new(raw.id, raw.title)
            .with_category(raw.category)
            .with_tags(raw.tags)
            .with_content(raw.content);
        if let Some(url) = raw.url {
            post = post.with_extra("url", url);
        }
        if let Some(date) = raw.date {
            post = post.with_extra("date", date);
        }
        post
    }
}

#[derive(Debug, Deserialize)]
struct XmlFeed {
    #[serde(rename = "post", default)]
    posts: Vec<XmlPost>,
}

/// Post data mapping: id -> post
#[derive(Debug, Clone, Default)]
pub struct PostCollection {
    posts: HashMap<String, Post>,
}

impl PostCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a post; a later post with the same id replaces the earlier one
    pub fn insert(&mut self, post: Post) -> Option<Post> {
        let replaced = self.posts.insert(post.id.clone(), post);
        if let Some(old) = &replaced {
            tracing::debug!(id = %old.id, "duplicate post id, keeping the later record");
        }
        replaced
    }

    /// Parse post data embedded at build time (e.g. via `include_str!`)
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(Self::from_json(serde_json::from_str(json)?))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(Self::from_json(serde_json::from_reader(reader)?))
    }

    /// Parse a `<posts><post>...</post></posts>` document
    pub fn from_xml_reader<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let feed: XmlFeed = quick_xml::de::from_reader(reader)?;
        Ok(feed.posts.into_iter().map(Post::from).collect())
    }

    /// Load post data from disk; `.json` or `.xml`, optionally gzip-compressed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (reader, format_path): (Box<dyn Read>, PathBuf) =
            if path.extension().is_some_and(|ext| ext == "gz") {
                (Box::new(GzDecoder::new(file)), path.with_extension(""))
            } else {
                (Box::new(file), path.to_path_buf())
            };
        let reader = BufReader::new(reader);

        let collection = match format_path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_reader(reader)?,
            Some("xml") => Self::from_xml_reader(reader)?,
            _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
        };

        tracing::info!(path = %path.display(), posts = collection.len(), "post data loaded");
        Ok(collection)
    }

    fn from_json(posts: JsonPosts) -> Self {
        match posts {
            JsonPosts::List(posts) => posts.into_iter().collect(),
            JsonPosts::Keyed(posts) => posts
                .into_iter()
                .map(|(key, mut post)| {
                    if post.id.is_empty() {
                        post.id = key;
                    }
                    post
                })
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.get(id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }

    pub fn into_posts(self) -> impl Iterator<Item = Post> {
        self.posts.into_values()
    }
}

impl FromIterator<Post> for PostCollection {
    fn from_iter<T: IntoIterator<Item = Post>>(iter: T) -> Self {
        let mut collection = Self::new();
        for post in iter {
            collection.insert(post);
        }
        collection
    }
}
