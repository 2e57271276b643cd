mod client;
mod types;

pub use client::{CodeBuildClient, DEFAULT_FETCH_TIMEOUT};
