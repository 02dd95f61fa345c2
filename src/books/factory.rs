use std::path::Path;
use std::sync::Arc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::library::LibraryResult;

pub fn create_book_repository(books: Vec<BookEntity>) -> Arc<dyn BookRepository> {
    Arc::new(MemoryBookRepository::new(books))
}

// The bulk data is either a bare array or wrapped as `{"books": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum BookSource {
    Wrapped { books: Vec<Value> },
    Bare(Vec<Value>),
}

// Every record is kept. Fields are coerced leniently by `BookEntity`; a record
// that is not an object becomes an empty entry.
pub fn parse_books(json: &str) -> LibraryResult<Vec<BookEntity>> {
    let records = match serde_json::from_str::<BookSource>(json)? {
        BookSource::Wrapped { books } => books,
        BookSource::Bare(books) => books,
    };
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(pos, record)| {
            let record = match record {
                Value::Object(fields) => fields,
                other => {
                    warn!("book record {} is not an object, keeping it empty: {}", pos, other);
                    Map::new()
                }
            };
            serde_json::from_value::<BookEntity>(Value::Object(record)).unwrap_or_else(|err| {
                warn!("book record {} kept with defaults: {}", pos, err);
                BookEntity::new("", "", &[], 0)
            })
        })
        .collect())
}

pub async fn read_books_file(path: &Path) -> LibraryResult<Vec<BookEntity>> {
    let json = tokio::fs::read_to_string(path).await?;
    parse_books(json.as_str())
}
