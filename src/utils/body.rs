use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};
use url::form_urlencoded;
use crate::books::dto::BookFields;
use crate::core::library::{LibraryError, LibraryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Unsupported,
}

pub fn body_kind(headers: &HeaderMap) -> BodyKind {
    let mime = headers.get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match mime.as_str() {
        "application/json" => BodyKind::Json,
        "application/x-www-form-urlencoded" => BodyKind::Form,
        _ => BodyKind::Unsupported,
    }
}

/// Parses a fully buffered request body into a flat field set.
///
/// The declared content type decides the format; anything other than JSON or
/// form encoding yields no fields.
pub fn parse_body(headers: &HeaderMap, body: &[u8]) -> LibraryResult<BookFields> {
    match body_kind(headers) {
        BodyKind::Json => parse_json(body),
        BodyKind::Form => Ok(parse_form(body)),
        BodyKind::Unsupported => Ok(BookFields::default()),
    }
}

fn parse_json(body: &[u8]) -> LibraryResult<BookFields> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(fields) => Ok(BookFields::new(fields)),
        _ => Err(LibraryError::malformed_body("Malformed JSON body: expected an object.")),
    }
}

// Repeated keys collect into an array.
fn parse_form(body: &[u8]) -> BookFields {
    let mut fields = Map::new();
    for (key, value) in form_urlencoded::parse(body).into_owned() {
        let value = Value::String(value);
        match fields.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                fields.insert(key, value);
            }
        }
    }
    BookFields::new(fields)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};
    use crate::core::library::LibraryError;
    use crate::utils::body::{body_kind, parse_body, BodyKind};

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_should_detect_body_kind() {
        assert_eq!(BodyKind::Json, body_kind(&headers("application/json; charset=utf-8")));
        assert_eq!(BodyKind::Form, body_kind(&headers("Application/X-WWW-Form-Urlencoded")));
        assert_eq!(BodyKind::Unsupported, body_kind(&headers("text/plain")));
        assert_eq!(BodyKind::Unsupported, body_kind(&HeaderMap::new()));
    }

    #[test]
    fn test_should_parse_json_body() {
        let fields = parse_body(&headers("application/json"),
                                br#"{"title": "Dune", "genres": ["scifi"], "year": 1965}"#)
            .expect("should parse");
        assert_eq!(Some("Dune".to_string()), fields.text("title"));
        assert_eq!(Some(Some(1965)), fields.non_negative_integer("year"));
    }

    #[test]
    fn test_should_reject_malformed_json() {
        let err = parse_body(&headers("application/json"), b"{\"title\": ").expect_err("should fail");
        assert!(matches!(err, LibraryError::MalformedBody { .. }));
        let err = parse_body(&headers("application/json"), b"[1, 2]").expect_err("should fail");
        assert!(matches!(err, LibraryError::MalformedBody { .. }));
    }

    #[test]
    fn test_should_parse_form_body() {
        let fields = parse_body(&headers("application/x-www-form-urlencoded"),
                                b"title=The+Hobbit&author=J.R.R.%20Tolkien&genres=fantasy&genres=adventure&year=1937")
            .expect("should parse");
        assert_eq!(Some("The Hobbit".to_string()), fields.text("title"));
        assert_eq!(Some("J.R.R. Tolkien".to_string()), fields.text("author"));
        assert_eq!(Some(vec!["fantasy".to_string(), "adventure".to_string()]), fields.list("genres"));
        assert_eq!(Some(Some(1937)), fields.non_negative_integer("year"));
    }

    #[test]
    fn test_should_ignore_unknown_content_type() {
        let fields = parse_body(&headers("text/plain"), b"title=Dune").expect("should parse");
        assert!(fields.is_empty());
    }
}
