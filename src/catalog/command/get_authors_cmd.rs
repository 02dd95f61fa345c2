use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub struct GetAuthorsCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl GetAuthorsCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default)]
pub struct GetAuthorsCommandRequest {}

#[derive(Debug, Serialize)]
pub struct GetAuthorsCommandResponse {
    pub authors: Vec<String>,
}

#[async_trait]
impl Command<GetAuthorsCommandRequest, GetAuthorsCommandResponse> for GetAuthorsCommand {
    async fn execute(&self, _req: GetAuthorsCommandRequest) -> Result<GetAuthorsCommandResponse, CommandError> {
        self.catalog_service.distinct_authors()
            .await.map_err(CommandError::from).map(|authors| GetAuthorsCommandResponse { authors })
    }
}
