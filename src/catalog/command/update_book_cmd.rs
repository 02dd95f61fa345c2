use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookFields;
use crate::books::repository::UpdateOutcome;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct UpdateBookCommandRequest {
    pub title: String,
    pub fields: BookFields,
}

impl UpdateBookCommandRequest {
    pub fn new(title: &str, fields: BookFields) -> Self {
        Self {
            title: title.to_string(),
            fields,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateBookCommandResponse {
    pub message: String,
    pub book: BookEntity,
}

impl From<UpdateOutcome> for UpdateBookCommandResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Updated(book) => Self {
                message: "Book updated successfully.".to_string(),
                book,
            },
            UpdateOutcome::Unchanged(book) => Self {
                message: "No updatable fields provided.".to_string(),
                book,
            },
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        self.catalog_service.update_book(req.title.as_str(), &req.fields)
            .await.map_err(CommandError::from).map(UpdateBookCommandResponse::from)
    }
}
