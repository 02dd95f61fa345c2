use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use crate::books::domain::Book;
use crate::books::domain::model::BookEntity;
use crate::books::dto::{BookFields, BookFilter, BookPatch};
use crate::books::repository::{BookRepository, UpdateOutcome};
use crate::books::title::normalize_title;
use crate::catalog::domain::{CatalogService, CatalogStats};
use crate::core::library::{LibraryError, LibraryResult};

pub struct CatalogServiceImpl {
    book_repository: Arc<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub fn new(book_repository: Arc<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

// Filters are case-insensitive substring matches, AND-combined; the filter
// values are already lower-cased.
pub fn matches_filter<B: Book>(book: &B, filter: &BookFilter) -> bool {
    let author_ok = filter.author.as_ref()
        .map_or(true, |author| book.author().to_lowercase().contains(author.as_str()));
    let genre_ok = filter.genre.as_ref()
        .map_or(true, |genre| book.genres().iter().any(|g| g.to_lowercase().contains(genre.as_str())));
    author_ok && genre_ok
}

pub fn filter_books<B: Book + Clone>(books: &[B], filter: &BookFilter) -> Vec<B> {
    books.iter()
        .filter(|b| matches_filter(*b, filter))
        .take(filter.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

// First-seen order.
pub fn distinct_genres<B: Book>(books: &[B]) -> Vec<String> {
    let mut seen = HashSet::new();
    books.iter()
        .flat_map(|b| b.genres().iter())
        .filter(|g| seen.insert(g.as_str()))
        .cloned()
        .collect()
}

pub fn distinct_authors<B: Book>(books: &[B]) -> Vec<String> {
    let mut seen = HashSet::new();
    books.iter()
        .map(|b| b.author())
        .filter(|a| !a.is_empty() && seen.insert(*a))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn list_books(&self, filter: &BookFilter) -> LibraryResult<Vec<BookEntity>> {
        let books = self.book_repository.snapshot().await;
        Ok(filter_books(&books, filter))
    }

    async fn find_book_by_title(&self, title: &str) -> LibraryResult<BookEntity> {
        self.book_repository.find_by_normalized_title(normalize_title(title).as_str()).await
            .map_err(|_| LibraryError::not_found(format!("Book titled \"{}\" not found.", title).as_str()))
    }

    async fn distinct_genres(&self) -> LibraryResult<Vec<String>> {
        Ok(distinct_genres(&self.book_repository.snapshot().await))
    }

    async fn distinct_authors(&self) -> LibraryResult<Vec<String>> {
        Ok(distinct_authors(&self.book_repository.snapshot().await))
    }

    async fn stats(&self) -> LibraryResult<CatalogStats> {
        let books = self.book_repository.snapshot().await;
        Ok(CatalogStats {
            total_books: books.len(),
            total_authors: distinct_authors(&books).len(),
            last_updated: Utc::now(),
        })
    }

    async fn add_book(&self, fields: &BookFields) -> LibraryResult<BookEntity> {
        let book = self.book_repository.insert(fields).await?;
        info!("added book {:?} by {:?}", book.title, book.author);
        Ok(book)
    }

    async fn update_book(&self, title: &str, fields: &BookFields) -> LibraryResult<UpdateOutcome> {
        let outcome = self.book_repository.update(title, &BookPatch::from(fields)).await?;
        if let UpdateOutcome::Updated(book) = &outcome {
            info!("updated book {:?} (requested as {:?})", book.title, title);
        }
        Ok(outcome)
    }
}
