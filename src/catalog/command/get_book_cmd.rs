use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::model::BookEntity;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub struct GetBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl GetBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct GetBookCommandRequest {
    pub title: String,
}

impl GetBookCommandRequest {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

// The book itself is the response body.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GetBookCommandResponse {
    pub book: BookEntity,
}

impl GetBookCommandResponse {
    pub fn new(book: BookEntity) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        self.catalog_service.find_book_by_title(req.title.as_str())
            .await.map_err(CommandError::from).map(GetBookCommandResponse::new)
    }
}
