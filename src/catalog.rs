//! The track catalog: a static, ordered list loaded once at startup.
//!
//! A catalog comes either from a TOML file listing tracks explicitly or from
//! scanning a music directory.

use std::path::PathBuf;

mod load;
mod model;
mod scan;

pub use load::load;
pub use model::{Catalog, Track};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("catalog has no tracks")]
    Empty,
}
