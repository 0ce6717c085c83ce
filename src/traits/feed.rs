use async_trait::async_trait;

/// Worker-side pull interface for samples.
///
/// `None` is terminal: the worker leaves its loop and reports that it exited.
#[async_trait]
pub trait SampleFeed<S>: Send + Sync {
    async fn next_sample(&self) -> Option<S>;
}
