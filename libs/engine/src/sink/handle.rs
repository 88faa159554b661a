use eyre::Result;

/// Persistence target for one kind of ingested element.
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    type Item: Send + Sync;

    async fn process(&self, element: &Self::Item) -> Result<()>;

    /// Persists what it can and reports how many elements were newly written.
    async fn process_batch(&self, elements: &[Self::Item]) -> Result<usize>;
}
