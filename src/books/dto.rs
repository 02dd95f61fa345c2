use std::collections::HashMap;
use serde_json::{Map, Value};
use crate::books::domain::model::{BookEntity, DEFAULT_COUNTRY, DEFAULT_LANGUAGE};
use crate::core::library::{LibraryError, LibraryResult};

pub const REQUIRED_FIELDS: [&str; 4] = ["title", "author", "genres", "year"];

// BookFields is the flat field set submitted by a client, from either a JSON
// object or a form-encoded body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFields {
    fields: Map<String, Value>,
}

impl BookFields {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // null and empty strings count as absent
    pub fn is_present(&self, name: &str) -> bool {
        match self.fields.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    pub fn text(&self, name: &str) -> Option<String> {
        if !self.is_present(name) {
            return None;
        }
        match self.fields.get(name)? {
            Value::String(s) => Some(s.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(items) => items.last().and_then(scalar_text),
            _ => None,
        }
    }

    // A single value becomes a one-element list.
    pub fn list(&self, name: &str) -> Option<Vec<String>> {
        if !self.is_present(name) {
            return None;
        }
        match self.fields.get(name)? {
            Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
            other => scalar_text(other).map(|s| vec![s]),
        }
    }

    /// Reads a non-negative integer field.
    ///
    /// Returns `None` when the field is absent and `Some(None)` when it is
    /// present but not a non-negative integer.
    pub fn non_negative_integer(&self, name: &str) -> Option<Option<i64>> {
        if !self.is_present(name) {
            return None;
        }
        let parsed = match self.fields.get(name)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        Some(parsed.filter(|n| *n >= 0))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl TryFrom<&BookFields> for BookEntity {
    type Error = LibraryError;

    fn try_from(fields: &BookFields) -> LibraryResult<Self> {
        if !REQUIRED_FIELDS.iter().all(|f| fields.is_present(f)) {
            return Err(LibraryError::missing_field(
                format!("Missing required field: {}", REQUIRED_FIELDS.join(", ")).as_str(),
                &REQUIRED_FIELDS));
        }
        let year = match fields.non_negative_integer("year") {
            Some(Some(year)) => year,
            _ => return Err(LibraryError::invalid_field("Invalid field: year must be a non-negative integer.", "year")),
        };
        Ok(BookEntity {
            title: fields.text("title").unwrap_or_default(),
            author: fields.text("author").unwrap_or_default(),
            country: fields.text("country").unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            language: fields.text("language").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            pages: fields.non_negative_integer("pages").flatten().unwrap_or(0),
            year,
            genres: fields.list("genres").unwrap_or_default(),
            link: fields.text("link").unwrap_or_default(),
            extra: Map::new(),
        })
    }
}

// BookPatch holds the recognized fields of a partial update. Numbers that do
// not parse as non-negative integers are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genres: Option<Vec<String>>,
    pub year: Option<i64>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i64>,
    pub link: Option<String>,
}

impl BookPatch {
    // Applies every field except the title, which needs re-indexing.
    // Returns true if any field was present.
    pub fn apply_details(&self, book: &mut BookEntity) -> bool {
        let mut updated = false;
        if let Some(author) = &self.author {
            book.author = author.to_string();
            updated = true;
        }
        if let Some(genres) = &self.genres {
            book.genres = genres.clone();
            updated = true;
        }
        if let Some(year) = self.year {
            book.year = year;
            updated = true;
        }
        if let Some(country) = &self.country {
            book.country = country.to_string();
            updated = true;
        }
        if let Some(language) = &self.language {
            book.language = language.to_string();
            updated = true;
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
            updated = true;
        }
        if let Some(link) = &self.link {
            book.link = link.to_string();
            updated = true;
        }
        updated
    }
}

impl From<&BookFields> for BookPatch {
    fn from(fields: &BookFields) -> Self {
        Self {
            title: fields.text("title"),
            author: fields.text("author"),
            genres: fields.list("genres"),
            year: fields.non_negative_integer("year").flatten(),
            country: fields.text("country"),
            language: fields.text("language"),
            pages: fields.non_negative_integer("pages").flatten(),
            link: fields.text("link"),
        }
    }
}

// BookFilter holds the listing query. Absent filters match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub author: Option<String>,
    pub genre: Option<String>,
    pub limit: Option<usize>,
}

impl BookFilter {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let non_empty = |name: &str| params.get(name).filter(|v| !v.is_empty()).map(|v| v.to_lowercase());
        Self {
            author: non_empty("author"),
            genre: non_empty("genre"),
            limit: params.get("limit").and_then(|l| l.trim().parse::<usize>().ok()),
        }
    }
}
