pub mod service;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::books::dto::{BookFields, BookFilter};
use crate::books::repository::UpdateOutcome;
use crate::core::library::LibraryResult;
use crate::utils::date::serializer;

// CatalogStats summarizes the catalog at the moment it was computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_books: usize,
    pub total_authors: usize,
    #[serde(with = "serializer")]
    pub last_updated: DateTime<Utc>,
}

#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn list_books(&self, filter: &BookFilter) -> LibraryResult<Vec<BookEntity>>;
    async fn find_book_by_title(&self, title: &str) -> LibraryResult<BookEntity>;
    async fn distinct_genres(&self) -> LibraryResult<Vec<String>>;
    async fn distinct_authors(&self) -> LibraryResult<Vec<String>>;
    async fn stats(&self) -> LibraryResult<CatalogStats>;
    async fn add_book(&self, fields: &BookFields) -> LibraryResult<BookEntity>;
    async fn update_book(&self, title: &str, fields: &BookFields) -> LibraryResult<UpdateOutcome>;
}
