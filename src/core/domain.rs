use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_FILE: &str = "data/books.json";
pub const DEFAULT_CLIENT_DIR: &str = "client";

// Identifiable defines the lookup key shared by catalog records
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}

// Configuration abstracts startup options for the catalog server
#[derive(Debug, PartialEq, Clone)]
pub struct Configuration {
    pub port: u16,
    pub data_file: PathBuf,
    pub client_dir: PathBuf,
}

impl Configuration {
    pub fn new(port: u16, data_file: &str, client_dir: &str) -> Self {
        Configuration {
            port,
            data_file: PathBuf::from(data_file),
            client_dir: PathBuf::from(client_dir),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let port = lookup("PORT")
            .or_else(|| lookup("NODE_PORT"))
            .and_then(|p| p.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_file = lookup("BOOKS_DATA").unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
        let client_dir = lookup("CLIENT_DIR").unwrap_or_else(|| DEFAULT_CLIENT_DIR.to_string());
        Configuration::new(port, data_file.as_str(), client_dir.as_str())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(DEFAULT_PORT, DEFAULT_DATA_FILE, DEFAULT_CLIENT_DIR)
    }
}
