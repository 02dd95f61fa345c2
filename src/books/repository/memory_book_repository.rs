use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::books::domain::model::BookEntity;
use crate::books::dto::{BookFields, BookPatch};
use crate::books::repository::{BookRepository, UpdateOutcome};
use crate::books::title::normalize_title;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};

// Shelf keeps the books in insertion order plus an index from normalized
// title to position. Positions are stable because books are never removed.
#[derive(Debug, Default)]
struct Shelf {
    books: Vec<BookEntity>,
    index: HashMap<String, usize>,
}

impl Shelf {
    // Duplicate keys in bulk data: the later book wins the index, both stay listed.
    fn rebuild(&mut self, books: Vec<BookEntity>) {
        self.index = books.iter().enumerate().map(|(pos, book)| (book.id(), pos)).collect();
        self.books = books;
    }

    fn get(&self, key: &str) -> Option<&BookEntity> {
        self.index.get(key).map(|pos| &self.books[*pos])
    }

    fn insert(&mut self, book: BookEntity) -> LibraryResult<BookEntity> {
        let key = book.id();
        if self.index.contains_key(&key) {
            return Err(LibraryError::conflict(
                format!("Book titled \"{}\" already exists.", book.title).as_str()));
        }
        self.books.push(book.clone());
        self.index.insert(key, self.books.len() - 1);
        Ok(book)
    }

    fn update(&mut self, current_title: &str, patch: &BookPatch) -> LibraryResult<UpdateOutcome> {
        let key = normalize_title(current_title);
        let pos = *self.index.get(&key).ok_or_else(|| LibraryError::not_found(
            format!("Book titled \"{}\" not found for update.", current_title).as_str()))?;

        // every check happens before the first write
        let retitle = match patch.title.as_deref() {
            Some(title) if title != self.books[pos].title => {
                let new_key = normalize_title(title);
                if matches!(self.index.get(&new_key), Some(other) if *other != pos) {
                    return Err(LibraryError::conflict(
                        format!("Book titled \"{}\" already exists.", title).as_str()));
                }
                Some((new_key, title.to_string()))
            }
            _ => None,
        };

        let book = &mut self.books[pos];
        let mut updated = patch.apply_details(book);
        if let Some((new_key, title)) = retitle {
            book.title = title;
            if self.index.get(&key) == Some(&pos) {
                self.index.remove(&key);
            }
            self.index.insert(new_key, pos);
            updated = true;
        }

        let book = self.books[pos].clone();
        if updated {
            Ok(UpdateOutcome::Updated(book))
        } else {
            Ok(UpdateOutcome::Unchanged(book))
        }
    }
}

// MemoryBookRepository is the process-wide book store. Writers hold the lock
// across lookup, conflict check and re-index so readers never see a half
// re-keyed book.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    shelf: RwLock<Shelf>,
}

impl MemoryBookRepository {
    pub fn new(books: Vec<BookEntity>) -> Self {
        let mut shelf = Shelf::default();
        shelf.rebuild(books);
        Self {
            shelf: RwLock::new(shelf),
        }
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn load(&self, books: Vec<BookEntity>) -> usize {
        let mut shelf = self.shelf.write().await;
        shelf.rebuild(books);
        info!("loaded {} books ({} distinct titles)", shelf.books.len(), shelf.index.len());
        shelf.books.len()
    }

    async fn find_by_normalized_title(&self, key: &str) -> LibraryResult<BookEntity> {
        let shelf = self.shelf.read().await;
        shelf.get(key).cloned().ok_or_else(|| LibraryError::not_found(
            format!("Book with key \"{}\" not found.", key).as_str()))
    }

    async fn insert(&self, fields: &BookFields) -> LibraryResult<BookEntity> {
        let book = BookEntity::try_from(fields)?;
        let mut shelf = self.shelf.write().await;
        let book = shelf.insert(book)?;
        debug!("indexed book {:?} at {}", book.id(), shelf.books.len() - 1);
        Ok(book)
    }

    async fn update(&self, current_title: &str, patch: &BookPatch) -> LibraryResult<UpdateOutcome> {
        self.shelf.write().await.update(current_title, patch)
    }

    async fn snapshot(&self) -> Vec<BookEntity> {
        self.shelf.read().await.books.clone()
    }
}
