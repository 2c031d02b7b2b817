//! Values a connector returns.

use cantata_error::CantataResult;
use futures_util::stream::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Boxed stream of text chunks produced by a backend.
pub type ChunkBoxStream = Pin<Box<dyn Stream<Item = CantataResult<String>> + Send>>;

/// Re-yields backend chunks while keeping their running total.
///
/// Each chunk passes through untouched as soon as it arrives; once the stream
/// ends, [`ChunkStream::into_total`] is the resolved completion.
///
/// # Examples
///
/// ```
/// use cantata_interface::ChunkStream;
/// use futures_util::StreamExt;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut stream = ChunkStream::from_chunks(["Hel", "lo"]);
/// while let Some(chunk) = stream.next().await {
///     println!("chunk: {}", chunk.unwrap());
/// }
/// assert_eq!(stream.into_total(), "Hello");
/// # }
/// ```
pub struct ChunkStream {
    inner: ChunkBoxStream,
    total: String,
    chunks: usize,
}

impl ChunkStream {
    /// Wraps a backend chunk stream.
    pub fn new(inner: impl Stream<Item = CantataResult<String>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(inner),
            total: String::new(),
            chunks: 0,
        }
    }

    /// A stream over fixed chunks.
    pub fn from_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks: Vec<CantataResult<String>> =
            chunks.into_iter().map(|chunk| Ok(chunk.into())).collect();
        Self::new(futures_util::stream::iter(chunks))
    }

    /// Text received so far.
    pub fn total(&self) -> &str {
        &self.total
    }

    /// Number of chunks received so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Consumes the stream, returning the text received.
    pub fn into_total(self) -> String {
        self.total
    }
}

impl Stream for ChunkStream {
    type Item = CantataResult<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.total.push_str(&chunk);
                this.chunks += 1;
                Poll::Ready(Some(Ok(chunk)))
            }
            other => other,
        }
    }
}

impl fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStream")
            .field("total", &self.total)
            .field("chunks", &self.chunks)
            .finish_non_exhaustive()
    }
}

/// Result of one connector call.
#[derive(Debug)]
pub enum Completion {
    /// The whole completion, already available
    Resolved(String),
    /// Chunks still arriving
    Streaming(ChunkStream),
}

impl Completion {
    /// An already-resolved completion.
    pub fn resolved(text: impl Into<String>) -> Self {
        Self::Resolved(text.into())
    }

    /// A streaming completion over a backend chunk stream.
    pub fn streaming(inner: impl Stream<Item = CantataResult<String>> + Send + 'static) -> Self {
        Self::Streaming(ChunkStream::new(inner))
    }

    /// Drains the completion into its final text.
    ///
    /// # Errors
    ///
    /// Returns the first error the chunk stream yields.
    pub async fn into_text(self) -> CantataResult<String> {
        match self {
            Self::Resolved(text) => Ok(text),
            Self::Streaming(mut stream) => {
                while let Some(chunk) = stream.next().await {
                    chunk?;
                }
                Ok(stream.into_total())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cantata_error::BackendError;

    #[tokio::test]
    async fn test_chunks_pass_through_and_accumulate() {
        let mut stream = ChunkStream::from_chunks(["A", "B", "C"]);
        let mut seen = Vec::new();
        while let Some(chunk) = stream.next().await {
            seen.push(chunk.unwrap());
            assert_eq!(stream.total(), seen.concat());
        }
        assert_eq!(seen, vec!["A", "B", "C"]);
        assert_eq!(stream.chunk_count(), 3);
        assert_eq!(stream.into_total(), "ABC");
    }

    #[tokio::test]
    async fn test_into_text_propagates_errors() {
        let chunks: Vec<CantataResult<String>> = vec![
            Ok("partial".to_string()),
            Err(BackendError::new("connection reset").into()),
        ];
        let completion = Completion::streaming(futures_util::stream::iter(chunks));
        assert!(completion.into_text().await.is_err());
    }

    #[tokio::test]
    async fn test_resolved_into_text() {
        let text = Completion::resolved("done").into_text().await.unwrap();
        assert_eq!(text, "done");
    }
}
