use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookFields;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub struct AddBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl AddBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct AddBookCommandRequest {
    pub fields: BookFields,
}

impl AddBookCommandRequest {
    pub fn new(fields: BookFields) -> Self {
        Self {
            fields,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddBookCommandResponse {
    pub message: String,
    pub book: BookEntity,
}

impl AddBookCommandResponse {
    pub fn new(book: BookEntity) -> Self {
        Self {
            message: "Book added successfully".to_string(),
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        self.catalog_service.add_book(&req.fields).await.map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}
