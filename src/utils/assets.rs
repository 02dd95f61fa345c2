use std::io;
use std::path::{Component, Path, PathBuf};

pub const INDEX_PAGE: &str = "client.html";
const MISSING_INDEX: &[u8] = b"Error: Client html not found";

// StaticAssets serves the front-end files from a base directory.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    base_dir: PathBuf,
}

impl StaticAssets {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self { base_dir: base.into() }
    }

    // None when the path tries to leave the base directory
    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    pub fn content_type(path: &Path) -> &'static str {
        match path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase().as_str() {
            "html" => "text/html",
            "css" => "text/css",
            "js" => "text/javascript",
            "png" => "image/png",
            "jpg" => "image/jpeg",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }

    pub async fn load(&self, url_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let path = self
            .map_path(url_path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !tokio::fs::metadata(&path).await?.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let bytes = tokio::fs::read(&path).await?;
        Ok((bytes, Self::content_type(&path)))
    }

    // The index page always answers; a placeholder stands in when the file is missing.
    pub async fn index(&self) -> (Vec<u8>, &'static str) {
        match self.load(INDEX_PAGE).await {
            Ok(page) => page,
            Err(_) => (MISSING_INDEX.to_vec(), "text/html"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use std::path::Path;
    use crate::utils::assets::StaticAssets;

    #[test]
    fn test_map_path_prevents_traversal() {
        let sf = StaticAssets::new("client");
        assert!(sf.map_path("../Cargo.toml").is_none());
        assert!(sf.map_path("/../../Cargo.toml").is_none());
        assert_eq!(Some(Path::new("client").join("style.css")), sf.map_path("/style.css"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!("text/css", StaticAssets::content_type(Path::new("a/style.css")));
        assert_eq!("image/jpeg", StaticAssets::content_type(Path::new("cover.JPG")));
        assert_eq!("application/octet-stream", StaticAssets::content_type(Path::new("data.bin")));
    }

    #[tokio::test]
    async fn test_load_plain_file() {
        let dir = tempfile::tempdir().expect("should create dir");
        fs::write(dir.path().join("hello.txt"), "Hello\n").expect("should write");
        let sf = StaticAssets::new(dir.path());
        let (bytes, ct) = sf.load("/hello.txt").await.expect("should load");
        assert_eq!("text/plain", ct);
        assert_eq!(b"Hello\n".to_vec(), bytes);
        let err = sf.load("/missing.txt").await.expect_err("should not load");
        assert_eq!(io::ErrorKind::NotFound, err.kind());

        fs::create_dir(dir.path().join("notes.txt")).expect("should create dir");
        let err = sf.load("/notes.txt").await.expect_err("should not load a directory");
        assert_eq!(io::ErrorKind::NotFound, err.kind());
    }

    #[tokio::test]
    async fn test_index_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().expect("should create dir");
        let sf = StaticAssets::new(dir.path());
        let (bytes, ct) = sf.index().await;
        assert_eq!("text/html", ct);
        assert_eq!(b"Error: Client html not found".to_vec(), bytes);

        fs::write(dir.path().join("client.html"), "<h1>Books</h1>").expect("should write");
        let (bytes, _) = sf.index().await;
        assert_eq!(b"<h1>Books</h1>".to_vec(), bytes);
    }
}
