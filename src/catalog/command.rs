pub mod add_book_cmd;
pub mod get_authors_cmd;
pub mod get_book_cmd;
pub mod get_genres_cmd;
pub mod get_stats_cmd;
pub mod list_books_cmd;
pub mod update_book_cmd;
