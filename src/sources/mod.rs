//! Component source retrieval.

pub mod archive;

pub use archive::{archive_url, ArchiveFetcher, ArchiveFormat, FetchError};
