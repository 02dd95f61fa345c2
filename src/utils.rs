pub mod assets;
pub mod body;
pub mod date;
pub mod logging;
