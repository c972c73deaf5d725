//! Remote table service: list, fetch and upload.

mod client;
mod mock;
mod service;

pub use client::{API_URL_ENV, DEFAULT_API_URL, RemoteClient};
pub use mock::MockTableService;
pub use service::{DEFAULT_FETCH_TOP, RemoteTable, TableService};
