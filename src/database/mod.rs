//! # Metadata Store Access
//!
//! The row-fetch collaborator boundary: everything that talks to the
//! cluster's metadata tables lives here, behind the [`LoadFetcher`]
//! trait. The analytics core consumes raw rows and never sees a
//! connection.

pub mod fetcher;

pub use fetcher::{FetchError, FetchWindow, LoadFetcher, LoadSelector, SqlLoadFetcher};
