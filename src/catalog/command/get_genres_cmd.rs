use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub struct GetGenresCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl GetGenresCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default)]
pub struct GetGenresCommandRequest {}

#[derive(Debug, Serialize)]
pub struct GetGenresCommandResponse {
    pub genres: Vec<String>,
}

#[async_trait]
impl Command<GetGenresCommandRequest, GetGenresCommandResponse> for GetGenresCommand {
    async fn execute(&self, _req: GetGenresCommandRequest) -> Result<GetGenresCommandResponse, CommandError> {
        self.catalog_service.distinct_genres()
            .await.map_err(CommandError::from).map(|genres| GetGenresCommandResponse { genres })
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::catalog::command::get_genres_cmd::{GetGenresCommand, GetGenresCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::Command;

    #[tokio::test]
    async fn test_should_run_get_genres() {
        let cmd = GetGenresCommand::new(factory::create_catalog_service_with(vec![
            BookEntity::new("Dune", "Frank Herbert", &["scifi", "classic"], 1965),
            BookEntity::new("Emma", "Jane Austen", &["classic"], 1815),
        ]));
        let res = cmd.execute(GetGenresCommandRequest::default()).await.expect("should get genres");
        assert_eq!(2, res.genres.len());
        assert!(res.genres.contains(&"scifi".to_string()));
    }
}
