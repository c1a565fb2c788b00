use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Indexed fields of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Category,
    Tags,
    Content,
}

impl Field {
    pub const COUNT: usize = 4;
    pub const ALL: [Field; Field::COUNT] = [Field::Title, Field::Category, Field::Tags, Field::Content];

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

/// Per-field counters, indexed by `Field::slot`
pub type FieldCounts = [usize; Field::COUNT];

/// Post record as emitted by the site generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "string_like")]
    pub id: String,
    #[serde(default, deserialize_with = "string_like")]
    pub title: String,
    #[serde(default, deserialize_with = "string_like")]
    pub category: String,
    #[serde(default, deserialize_with = "string_like")]
    pub tags: String,
    #[serde(default, deserialize_with = "string_like")]
    pub content: String,
    /// Anything else the generator emits (url, date, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Post {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: String::new(),
            tags: String::new(),
            content: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Raw text of one indexed field
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Category => &self.category,
            Field::Tags => &self.tags,
            Field::Content => &self.content,
        }
    }
}

/// A post after indexing: everything except the raw content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicPost {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tags: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl From<Post> for PublicPost {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            category: post.category,
            tags: post.tags,
            extra: post.extra,
        }
    }
}

/// Document statistics for BM25F length normalization
#[derive(Debug, Clone)]
pub struct DocStats {
    pub id: String,
    pub field_lengths: FieldCounts,
}

impl DocStats {
    pub fn new(id: String) -> Self {
        Self {
            id,
            field_lengths: [0; Field::COUNT],
        }
    }

    pub fn field_length(&self, field: Field) -> usize {
        self.field_lengths[field.slot()]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringLike {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    List(Vec<StringLike>),
    Null,
}

impl StringLike {
    fn into_text(self) -> String {
        match self {
            StringLike::Text(s) => s,
            StringLike::Number(n) => n.to_string(),
            StringLike::Bool(b) => b.to_string(),
            StringLike::List(items) => items
                .into_iter()
                .map(StringLike::into_text)
                .collect::<Vec<_>>()
                .join(","),
            StringLike::Null => String::new(),
        }
    }
}

/// Accept strings, numbers, booleans, lists and null wherever text is expected
fn string_like<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringLike::deserialize(deserializer).map(StringLike::into_text)
}
