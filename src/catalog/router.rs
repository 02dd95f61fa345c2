use std::collections::HashMap;
use axum::http::Method;
use url::form_urlencoded;

pub const STATIC_SUFFIXES: [&str; 5] = [".css", ".js", ".png", ".jpg", ".txt"];
pub const DOCUMENTATION_PATH: &str = "/documentation.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    // any non-empty, percent-decoded segment other than the reserved literal
    Capture(Option<&'static str>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Index,
    ListBooks,
    GetBook,
    Genres,
    Authors,
    Stats,
    AddBook,
    UpdateBook,
}

#[derive(Debug)]
pub struct RouteEntry {
    pub access: Access,
    pub pattern: &'static [Segment],
    pub handler: Handler,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Asset(String),
    Handler {
        handler: Handler,
        title: Option<String>,
    },
    NotFound,
}

use self::Segment::{Capture, Literal};

// Matched top-down, first match wins.
pub static ROUTES: &[RouteEntry] = &[
    RouteEntry { access: Access::Read, pattern: &[], handler: Handler::Index },
    RouteEntry { access: Access::Read, pattern: &[Literal("api"), Literal("books")], handler: Handler::ListBooks },
    RouteEntry { access: Access::Read, pattern: &[Literal("api"), Literal("booksByTitle")], handler: Handler::ListBooks },
    RouteEntry {
        access: Access::Read,
        pattern: &[Literal("api"), Literal("books"), Capture(Some("books"))],
        handler: Handler::GetBook,
    },
    RouteEntry {
        access: Access::Read,
        pattern: &[Literal("api"), Literal("booksByTitle"), Capture(Some("booksByTitle"))],
        handler: Handler::GetBook,
    },
    RouteEntry { access: Access::Read, pattern: &[Literal("api"), Literal("genres")], handler: Handler::Genres },
    RouteEntry { access: Access::Read, pattern: &[Literal("api"), Literal("authors")], handler: Handler::Authors },
    RouteEntry { access: Access::Read, pattern: &[Literal("api"), Literal("stats")], handler: Handler::Stats },
    RouteEntry { access: Access::Write, pattern: &[Literal("api"), Literal("books")], handler: Handler::AddBook },
    RouteEntry {
        access: Access::Write,
        pattern: &[Literal("api"), Literal("books"), Capture(None)],
        handler: Handler::UpdateBook,
    },
];

impl RouteEntry {
    /// Matches the path segments against this entry's pattern.
    ///
    /// Returns `None` on mismatch, otherwise the decoded capture if the pattern has one.
    pub fn matches(&self, segments: &[&str]) -> Option<Option<String>> {
        if segments.len() != self.pattern.len() {
            return None;
        }
        let mut captured = None;
        for (segment, expected) in segments.iter().zip(self.pattern.iter()) {
            match expected {
                Literal(literal) => {
                    if segment != literal {
                        return None;
                    }
                }
                Capture(reserved) => {
                    if segment.is_empty() || Some(*segment) == *reserved {
                        return None;
                    }
                    captured = Some(urlencoding::decode(segment).ok()?.into_owned());
                }
            }
        }
        Some(captured)
    }
}

pub fn access_for(method: &Method) -> Option<Access> {
    match *method {
        Method::GET | Method::HEAD => Some(Access::Read),
        Method::POST => Some(Access::Write),
        _ => None,
    }
}

pub fn is_static_asset(path: &str) -> bool {
    path == DOCUMENTATION_PATH || STATIC_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

fn split_path(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        return Some(vec![]);
    }
    Some(rest.split('/').collect())
}

/// Classifies a request by method and path. Every request is resolved on its own.
pub fn resolve(method: &Method, path: &str) -> Route {
    let access = match access_for(method) {
        Some(access) => access,
        None => return Route::NotFound,
    };
    if access == Access::Read && is_static_asset(path) {
        return Route::Asset(path.to_string());
    }
    let segments = match split_path(path) {
        Some(segments) => segments,
        None => return Route::NotFound,
    };
    ROUTES.iter()
        .filter(|entry| entry.access == access)
        .find_map(|entry| entry.matches(&segments).map(|title| Route::Handler { handler: entry.handler, title }))
        .unwrap_or(Route::NotFound)
}

// Repeated keys: the last value wins.
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}
