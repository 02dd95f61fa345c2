use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookFilter;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default)]
pub struct ListBooksCommandRequest {
    pub filter: BookFilter,
}

impl ListBooksCommandRequest {
    pub fn new(filter: BookFilter) -> Self {
        Self {
            filter,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListBooksCommandResponse {
    pub count: usize,
    pub books: Vec<BookEntity>,
}

impl ListBooksCommandResponse {
    pub fn new(books: Vec<BookEntity>) -> Self {
        Self {
            count: books.len(),
            books,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        self.catalog_service.list_books(&req.filter)
            .await.map_err(CommandError::from).map(ListBooksCommandResponse::new)
    }
}
