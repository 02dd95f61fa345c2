use std::io;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tracing::{debug, error, warn};
use crate::books::dto::{BookFields, BookFilter};
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_authors_cmd::{GetAuthorsCommand, GetAuthorsCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::get_genres_cmd::{GetGenresCommand, GetGenresCommandRequest};
use crate::catalog::command::get_stats_cmd::{GetStatsCommand, GetStatsCommandRequest};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
use crate::catalog::router::{self, Handler, Route};
use crate::core::command::Command;
use crate::core::controller::{
    body_to_server_error, content_response, json_response, without_body, AppState, ServerError,
};
use crate::core::library::LibraryError;
use crate::utils::body::parse_body;

const NOT_FOUND_PAGE: &[u8] = b"Not Found: The requested endpoint does not exist.";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
}

// Every request lands here; the route table in `router` decides what it means.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>) -> Response {
    let response = match router::resolve(&method, uri.path()) {
        Route::Asset(path) => serve_asset(&state, path.as_str()).await,
        Route::Handler { handler: Handler::Index, .. } => {
            let (page, content_type) = state.assets.index().await;
            content_response(StatusCode::OK, content_type, page)
        }
        Route::Handler { handler, title } => {
            match handle_api(&state, handler, title, uri.query(), &headers, body).await {
                Ok(response) => response,
                Err(err) => {
                    debug!("{} {} rejected with {}: {}", method, uri.path(), err.status, err.message);
                    err.into_response()
                }
            }
        }
        Route::NotFound => not_found_page(),
    };
    if method == Method::HEAD {
        without_body(response)
    } else {
        response
    }
}

async fn serve_asset(state: &AppState, path: &str) -> Response {
    match state.assets.load(path).await {
        Ok((bytes, content_type)) => content_response(StatusCode::OK, content_type, bytes),
        Err(err) => asset_failure(path, err),
    }
}

// Only a missing asset is a 404; any other I/O fault is a server error.
fn asset_failure(path: &str, err: io::Error) -> Response {
    if err.kind() == io::ErrorKind::NotFound {
        debug!("static asset {} unavailable: {}", path, err);
        return not_found_page();
    }
    error!("failed to read static asset {}: {}", path, err);
    ServerError::from(LibraryError::from(err)).into_response()
}

fn not_found_page() -> Response {
    content_response(StatusCode::NOT_FOUND, "text/html", NOT_FOUND_PAGE.to_vec())
}

async fn handle_api(
    state: &AppState,
    handler: Handler,
    title: Option<String>,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>) -> Result<Response, ServerError> {
    let svc = state.catalog.clone();
    let title = title.unwrap_or_default();
    match handler {
        Handler::ListBooks => {
            let filter = BookFilter::from_query(&router::parse_query(query));
            let res = ListBooksCommand::new(svc).execute(ListBooksCommandRequest::new(filter)).await?;
            Ok(json_response(StatusCode::OK, &res))
        }
        Handler::GetBook => {
            let res = GetBookCommand::new(svc).execute(GetBookCommandRequest::new(title.as_str())).await?;
            Ok(json_response(StatusCode::OK, &res))
        }
        Handler::Genres => {
            let res = GetGenresCommand::new(svc).execute(GetGenresCommandRequest::default()).await?;
            Ok(json_response(StatusCode::OK, &res))
        }
        Handler::Authors => {
            let res = GetAuthorsCommand::new(svc).execute(GetAuthorsCommandRequest::default()).await?;
            Ok(json_response(StatusCode::OK, &res))
        }
        Handler::Stats => {
            let res = GetStatsCommand::new(svc).execute(GetStatsCommandRequest::default()).await?;
            Ok(json_response(StatusCode::OK, &res))
        }
        Handler::AddBook => {
            let fields = read_fields(headers, body)?;
            let res = AddBookCommand::new(svc).execute(AddBookCommandRequest::new(fields)).await?;
            Ok(json_response(StatusCode::CREATED, &res))
        }
        Handler::UpdateBook => {
            let fields = read_fields(headers, body)?;
            let res = UpdateBookCommand::new(svc)
                .execute(UpdateBookCommandRequest::new(title.as_str(), fields)).await?;
            Ok(json_response(StatusCode::OK, &res))
        }
        Handler::Index => Err(ServerError::new(StatusCode::NOT_FOUND, "Not Found")),
    }
}

fn read_fields(headers: &HeaderMap, body: Result<Bytes, BytesRejection>) -> Result<BookFields, ServerError> {
    let bytes = body.map_err(|err| {
        warn!("failed to read request body: {}", err);
        body_to_server_error(err)
    })?;
    Ok(parse_body(headers, &bytes)?)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use crate::books::domain::model::BookEntity;
    use crate::catalog::controller::{asset_failure, build_router};
    use crate::catalog::factory;
    use crate::core::controller::AppState;
    use crate::core::domain::Configuration;

    fn app_in(client_dir: &str) -> Router {
        let config = Configuration::new(0, "unused.json", client_dir);
        let catalog = factory::create_catalog_service_with(vec![
            BookEntity::new("The Hobbit", "J. R. R. Tolkien", &["Fantasy", "Adventure"], 1937),
            BookEntity::new("Emma", "Jane Austen", &["Romance"], 1815),
        ]);
        build_router(AppState::new(&config, catalog))
    }

    fn app() -> Router {
        app_in("no-such-client-dir")
    }

    async fn send(app: &Router, method: Method, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None, "").await
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(app, Method::POST, uri, Some("application/json"), body.to_string().as_str()).await
    }

    #[tokio::test]
    async fn test_should_run_dune_walkthrough() {
        let app = app();
        let dune = json!({ "title": "Dune", "author": "Frank Herbert", "genres": ["scifi"], "year": 1965 });

        let (status, body) = post_json(&app, "/api/books", dune.clone()).await;
        assert_eq!(StatusCode::CREATED, status);
        assert_eq!("Book added successfully", body["message"]);

        let (status, body) = get(&app, "/api/books/dune").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(1965, body["year"]);
        assert_eq!("Frank Herbert", body["author"]);
        assert_eq!(json!(["scifi"]), body["genres"]);

        let (status, body) = post_json(&app, "/api/books", dune).await;
        assert_eq!(StatusCode::CONFLICT, status);
        assert_eq!("Book titled \"Dune\" already exists.", body["message"]);

        let (status, body) = post_json(&app, "/api/books/Dune", json!({ "year": 1966 })).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(1966, body["book"]["year"]);
        assert_eq!("Frank Herbert", body["book"]["author"]);
    }

    #[tokio::test]
    async fn test_should_list_with_filters() {
        let app = app();
        let (status, body) = get(&app, "/api/books").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(2, body["count"]);

        let (_, body) = get(&app, "/api/books?genre=ADVENT").await;
        assert_eq!(1, body["count"]);
        assert_eq!("The Hobbit", body["books"][0]["title"]);

        let (_, body) = get(&app, "/api/booksByTitle?author=austen&limit=5").await;
        assert_eq!(1, body["count"]);

        let (_, body) = get(&app, "/api/books?limit=1").await;
        assert_eq!(1, body["count"]);
        assert_eq!("The Hobbit", body["books"][0]["title"]);
    }

    #[tokio::test]
    async fn test_should_lookup_by_encoded_title() {
        let app = app();
        let (status, body) = get(&app, "/api/booksByTitle/the%20HOBBIT").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("J. R. R. Tolkien", body["author"]);

        let (status, body) = get(&app, "/api/books/Ulysses").await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!("Book titled \"Ulysses\" not found.", body["message"]);
    }

    #[tokio::test]
    async fn test_should_serve_aggregates() {
        let app = app();
        let (_, body) = get(&app, "/api/genres").await;
        assert_eq!(json!(["Fantasy", "Adventure", "Romance"]), body["genres"]);

        let (_, body) = get(&app, "/api/authors").await;
        assert_eq!(json!(["J. R. R. Tolkien", "Jane Austen"]), body["authors"]);

        let (status, body) = get(&app, "/api/stats").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(2, body["totalBooks"]);
        assert_eq!(2, body["totalAuthors"]);
        assert!(body["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn test_should_reject_bad_writes() {
        let app = app();
        let (status, body) = post_json(&app, "/api/books", json!({ "title": "Dune" })).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("Missing required field: title, author, genres, year", body["message"]);

        let (status, _) = post_json(&app, "/api/books",
                                    json!({ "title": "Dune", "author": "Frank Herbert", "genres": [], "year": "-3" })).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);

        let (status, body) = send(&app, Method::POST, "/api/books", Some("application/json"), "{not json").await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert!(body["message"].is_string());

        let (status, _) = post_json(&app, "/api/books/Ulysses", json!({ "year": 1922 })).await;
        assert_eq!(StatusCode::NOT_FOUND, status);

        let (status, _) = post_json(&app, "/api/books/Emma", json!({ "title": "the hobbit" })).await;
        assert_eq!(StatusCode::CONFLICT, status);
        let (_, body) = get(&app, "/api/books/emma").await;
        assert_eq!("Emma", body["title"]);

        let (_, body) = get(&app, "/api/stats").await;
        assert_eq!(2, body["totalBooks"]);
    }

    #[tokio::test]
    async fn test_should_accept_form_bodies() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/books", Some("application/x-www-form-urlencoded"),
                                  "title=Dracula&author=Bram+Stoker&genres=horror&year=1897&pages=418").await;
        assert_eq!(StatusCode::CREATED, status);
        assert_eq!(json!(["horror"]), body["book"]["genres"]);
        assert_eq!(418, body["book"]["pages"]);

        let (status, body) = send(&app, Method::POST, "/api/books/dracula", Some("application/x-www-form-urlencoded"),
                                  "title=Dracula%20(1897)").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("Book updated successfully.", body["message"]);
        let (status, _) = get(&app, "/api/books/Dracula%20(1897)").await;
        assert_eq!(StatusCode::OK, status);
    }

    #[tokio::test]
    async fn test_should_report_noop_update() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/books/emma", Some("text/plain"), "year=1900").await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("No updatable fields provided.", body["message"]);
        assert_eq!(1815, body["book"]["year"]);
    }

    #[tokio::test]
    async fn test_should_answer_head_without_body() {
        let app = app();
        let request = Request::builder().method(Method::HEAD).uri("/api/stats").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(StatusCode::OK, response.status());
        assert_eq!("application/json", response.headers()[header::CONTENT_TYPE]);
        let length: usize = response.headers()[header::CONTENT_LENGTH].to_str().unwrap().parse().unwrap();
        assert!(length > 0);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_should_serve_static_and_not_found_pages() {
        let dir = tempfile::tempdir().expect("should create dir");
        fs::write(dir.path().join("style.css"), "body {}").expect("should write");
        fs::write(dir.path().join("client.html"), "<h1>Books</h1>").expect("should write");
        let app = app_in(dir.path().to_str().unwrap());

        let request = Request::builder().uri("/style.css").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(StatusCode::OK, response.status());
        assert_eq!("text/css", response.headers()[header::CONTENT_TYPE]);
        assert_eq!("7", response.headers()[header::CONTENT_LENGTH]);

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(StatusCode::OK, response.status());
        assert_eq!("text/html", response.headers()[header::CONTENT_TYPE]);

        for uri in ["/missing.png", "/documentation.html", "/api/nothing", "/api/books/"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(StatusCode::NOT_FOUND, response.status(), "GET {}", uri);
            assert_eq!("text/html", response.headers()[header::CONTENT_TYPE]);
        }

        let request = Request::builder().method(Method::DELETE).uri("/api/books/emma").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(StatusCode::NOT_FOUND, response.status());
    }

    #[tokio::test]
    async fn test_should_separate_missing_assets_from_read_faults() {
        let response = asset_failure("/style.css", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(StatusCode::NOT_FOUND, response.status());
        assert_eq!("text/html", response.headers()[header::CONTENT_TYPE]);

        let response = asset_failure("/style.css", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
        assert_eq!("application/json", response.headers()[header::CONTENT_TYPE]);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].as_str().unwrap().contains("denied"));
    }
}
