use std::net::SocketAddr;
use tracing::{info, warn};
use bookshelf::books::factory::{create_book_repository, read_books_file};
use bookshelf::catalog::controller::build_router;
use bookshelf::catalog::factory::create_catalog_service;
use bookshelf::core::controller::AppState;
use bookshelf::core::domain::Configuration;
use bookshelf::utils::logging::setup_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    setup_tracing();

    let config = Configuration::from_env();
    let books = match read_books_file(&config.data_file).await {
        Ok(books) => books,
        Err(err) => {
            warn!("starting with an empty catalog, could not load {:?}: {}", config.data_file, err);
            vec![]
        }
    };
    info!("loaded {} books from {:?}", books.len(), config.data_file);

    let catalog = create_catalog_service(create_book_repository(books));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(AppState::new(&config, catalog));

    info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
