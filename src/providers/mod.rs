mod codebuild;

pub use codebuild::{CodeBuildClient, DEFAULT_FETCH_TIMEOUT};

use crate::build::BuildSnapshot;
use crate::error::FetchError;

/// A source of build snapshots.
///
/// Implementations perform a single query per call and never retry; the
/// monitor decides what to do with each error class.
#[allow(async_fn_in_trait)]
pub trait StatusProvider {
    async fn fetch(&self, build_id: &str) -> Result<BuildSnapshot, FetchError>;
}
