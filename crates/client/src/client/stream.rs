//! Bounded-chunk byte stream over a streaming response body.
//!
//! Invariants:
//! - At most one upstream chunk is held at a time.
//! - Every yielded chunk is at most `max_chunk` bytes and non-empty.
//! - Concatenating the yielded chunks reproduces the body exactly.

use bytes::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use crate::error::{ClientError, Result};

/// Default upper bound on a yielded chunk, in bytes.
pub const DEFAULT_MAX_CHUNK: usize = 8192;

/// Lazy, finite sequence of body chunks.
///
/// Restarting requires calling [`crate::SplunkClient::stream_results`] again.
pub struct ResultStream {
    inner: BoxStream<'static, Result<Bytes>>,
    pending: Bytes,
    max_chunk: usize,
    bytes_yielded: u64,
}

impl std::fmt::Debug for ResultStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStream")
            .field("pending", &self.pending.len())
            .field("max_chunk", &self.max_chunk)
            .field("bytes_yielded", &self.bytes_yielded)
            .finish()
    }
}

impl ResultStream {
    pub(crate) fn from_response(response: reqwest::Response, operation: &str) -> Self {
        let operation = operation.to_string();
        let inner = response
            .bytes_stream()
            .map(move |chunk| {
                chunk.map_err(|source| ClientError::Transport {
                    operation: operation.clone(),
                    source,
                })
            })
            .boxed();
        Self::from_stream(inner)
    }

    /// Wrap an arbitrary chunk stream.
    pub fn from_stream(inner: impl Stream<Item = Result<Bytes>> + Send + 'static) -> Self {
        Self {
            inner: inner.boxed(),
            pending: Bytes::new(),
            max_chunk: DEFAULT_MAX_CHUNK,
            bytes_yielded: 0,
        }
    }

    /// Cap yielded chunks at `max_chunk` bytes (minimum 1).
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk.max(1);
        self
    }

    pub fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    /// Total bytes yielded so far.
    pub fn bytes_yielded(&self) -> u64 {
        self.bytes_yielded
    }

    /// Drain the stream into an async writer, returning the byte count.
    pub async fn copy_to<W>(mut self, writer: &mut W) -> Result<u64>
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        use tokio::io::AsyncWriteExt;

        while let Some(chunk) = self.next().await {
            writer.write_all(&chunk?).await?;
        }
        writer.flush().await?;
        Ok(self.bytes_yielded)
    }
}

impl Stream for ResultStream {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if !this.pending.is_empty() {
                let take = this.pending.len().min(this.max_chunk);
                let chunk = this.pending.split_to(take);
                this.bytes_yielded += chunk.len() as u64;
                return Poll::Ready(Some(Ok(chunk)));
            }
            match ready!(this.inner.as_mut().poll_next(cx)) {
                Some(Ok(bytes)) => this.pending = bytes,
                Some(Err(err)) => return Poll::Ready(Some(Err(err))),
                None => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(sizes: &[usize]) -> Vec<Result<Bytes>> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| Ok(Bytes::from(vec![b'a' + (i % 26) as u8; n])))
            .collect()
    }

    #[tokio::test]
    async fn test_rechunks_large_upstream_chunks() {
        let upstream = stream::iter(chunks(&[10_000, 3, 0, 8192]));
        let mut result = ResultStream::from_stream(upstream).with_max_chunk(4096);

        let mut sizes = Vec::new();
        while let Some(chunk) = result.next().await {
            sizes.push(chunk.unwrap().len());
        }
        assert_eq!(sizes, vec![4096, 4096, 1808, 3, 4096, 4096]);
        assert_eq!(result.bytes_yielded(), 18_195);
    }

    #[tokio::test]
    async fn test_upstream_error_is_yielded() {
        let upstream = stream::iter(vec![
            Ok(Bytes::from_static(b"abc")),
            Err(ClientError::invalid_response("export", "connection reset")),
        ]);
        let mut result = ResultStream::from_stream(upstream);
        assert_eq!(result.next().await.unwrap().unwrap(), Bytes::from_static(b"abc"));
        assert!(result.next().await.unwrap().is_err());
        assert!(result.next().await.is_none());
    }

    #[tokio::test]
    async fn test_copy_to_writer() {
        let upstream = stream::iter(chunks(&[5, 7]));
        let mut out = Vec::new();
        let written = ResultStream::from_stream(upstream)
            .with_max_chunk(2)
            .copy_to(&mut out)
            .await
            .unwrap();
        assert_eq!(written, 12);
        assert_eq!(out, b"aaaaabbbbbbb");
    }
}
