pub mod config;
pub mod detail;
pub mod directory;
pub mod error;
pub mod index;
pub mod keywords;
pub mod search;
pub mod snapshot;
pub mod table;

pub use config::DirectoryConfig;
pub use directory::Directory;
pub use error::DirectoryError;
pub use search::{SearchHit, SearchMode};
