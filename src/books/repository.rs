pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::dto::{BookFields, BookPatch};
use crate::core::library::LibraryResult;

// UpdateOutcome tells a real update apart from a request that carried no updatable field.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(BookEntity),
    Unchanged(BookEntity),
}

impl UpdateOutcome {
    pub fn book(&self) -> &BookEntity {
        match self {
            UpdateOutcome::Updated(book) => book,
            UpdateOutcome::Unchanged(book) => book,
        }
    }
}

#[async_trait]
pub trait BookRepository: Sync + Send {
    // replaces the whole dataset, returns the number of books loaded
    async fn load(&self, books: Vec<BookEntity>) -> usize;

    // get a book by normalized title
    async fn find_by_normalized_title(&self, key: &str) -> LibraryResult<BookEntity>;

    // validates and appends a new book
    async fn insert(&self, fields: &BookFields) -> LibraryResult<BookEntity>;

    // applies a partial update to the book currently titled `current_title`
    async fn update(&self, current_title: &str, patch: &BookPatch) -> LibraryResult<UpdateOutcome>;

    // consistent copy of all books in insertion order
    async fn snapshot(&self) -> Vec<BookEntity>;
}
