use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::books::domain::Book;
use crate::books::title::normalize_title;
use crate::core::domain::Identifiable;

pub const DEFAULT_COUNTRY: &str = "Unknown";
pub const DEFAULT_LANGUAGE: &str = "English";

// BookEntity is a single catalog entry. The normalized title is never stored,
// it is derived from `title` whenever the entry is indexed. Loaded records are
// taken as they come: mistyped or null fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntity {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub author: String,
    #[serde(default = "default_country", deserialize_with = "lenient::country")]
    pub country: String,
    #[serde(default = "default_language", deserialize_with = "lenient::language")]
    pub language: String,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub pages: i64,
    // signed: bulk data may carry years before the common era
    #[serde(default, deserialize_with = "lenient::integer")]
    pub year: i64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub link: String,
    // fields of loaded records that the catalog does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn country<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_else(super::default_country))
    }

    pub fn language<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_else(super::default_language))
    }

    // 1603.0 and "1603" both read as 1603
    pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let parsed = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        Ok(parsed.unwrap_or_default())
    }

    pub fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
            other => scalar_text(other).into_iter().collect(),
        })
    }
}

impl BookEntity {
    pub fn new(title: &str, author: &str, genres: &[&str], year: i64) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            country: default_country(),
            language: default_language(),
            pages: 0,
            year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            link: "".to_string(),
            extra: Map::new(),
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        normalize_title(self.title.as_str())
    }
}

impl Book for BookEntity {
    fn title(&self) -> &str {
        self.title.as_str()
    }

    fn author(&self) -> &str {
        self.author.as_str()
    }

    fn genres(&self) -> &[String] {
        self.genres.as_slice()
    }
}
