use async_trait::async_trait;

/// Anything that can produce the raw bytes of a state document.
///
/// Implemented by the local filesystem source and the per-workspace remote
/// source; the resolve pipeline is written against this seam so decoding and
/// extraction never care where the bytes came from.
#[async_trait]
pub trait StateSource: Send + Sync {
    /// Human-readable description of where the bytes come from, for
    /// diagnostics.
    fn describe(&self) -> String;

    /// Obtain the raw state document bytes.
    async fn load(&self) -> Result<Vec<u8>, crate::Error>;
}
