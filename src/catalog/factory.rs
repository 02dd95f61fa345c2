use std::sync::Arc;
use crate::books::domain::model::BookEntity;
use crate::books::factory;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;

pub fn create_catalog_service(book_repository: Arc<dyn BookRepository>) -> Arc<dyn CatalogService> {
    Arc::new(CatalogServiceImpl::new(book_repository))
}

pub fn create_catalog_service_with(books: Vec<BookEntity>) -> Arc<dyn CatalogService> {
    create_catalog_service(factory::create_book_repository(books))
}
