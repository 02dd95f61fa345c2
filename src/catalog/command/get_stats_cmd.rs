use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::domain::{CatalogService, CatalogStats};
use crate::core::command::{Command, CommandError};

pub struct GetStatsCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl GetStatsCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default)]
pub struct GetStatsCommandRequest {}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct GetStatsCommandResponse {
    pub stats: CatalogStats,
}

#[async_trait]
impl Command<GetStatsCommandRequest, GetStatsCommandResponse> for GetStatsCommand {
    async fn execute(&self, _req: GetStatsCommandRequest) -> Result<GetStatsCommandResponse, CommandError> {
        self.catalog_service.stats()
            .await.map_err(CommandError::from).map(|stats| GetStatsCommandResponse { stats })
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::catalog::command::get_stats_cmd::{GetStatsCommand, GetStatsCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::Command;

    #[tokio::test]
    async fn test_should_run_get_stats() {
        let cmd = GetStatsCommand::new(factory::create_catalog_service_with(vec![
            BookEntity::new("Dune", "Frank Herbert", &[], 1965),
            BookEntity::new("Emma", "Jane Austen", &[], 1815),
        ]));
        let res = cmd.execute(GetStatsCommandRequest::default()).await.expect("should get stats");
        let encoded = serde_json::to_value(&res).expect("should encode");
        assert_eq!(2, encoded["totalBooks"]);
        assert_eq!(2, encoded["totalAuthors"]);
        assert!(encoded["lastUpdated"].as_str().map_or(false, |t| t.ends_with('Z')));
    }
}
