//! Response body types for buffered and streamed replies.
//!
//! Buffered replies (JSON, XML, text, HTML, binary) use `Full<Bytes>`.
//! Stream replies pull from an `AsyncRead` as the connection drains, so the
//! source is never read into memory as a whole.

use bytes::Bytes;
use http_body_util::{Either, Full, StreamBody};
use hyper::body::Frame;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncRead;
use tokio_stream::Stream;
use tokio_util::io::ReaderStream;

/// Boxed byte source for stream replies.
pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;

/// Default read chunk size for stream replies.
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 8 * 1024;

/// Wrapper stream that converts reader chunks to `Frame<Bytes>`.
pub struct ReaderFrameStream {
    inner: ReaderStream<BoxReader>,
}

impl ReaderFrameStream {
    /// Create a frame stream reading from `reader` in default-sized chunks.
    pub fn new(reader: BoxReader) -> Self {
        Self::with_capacity(reader, DEFAULT_STREAM_CHUNK_SIZE)
    }

    /// Create a frame stream with a custom chunk size.
    pub fn with_capacity(reader: BoxReader, capacity: usize) -> Self {
        Self {
            inner: ReaderStream::with_capacity(reader, capacity),
        }
    }
}

impl Stream for ReaderFrameStream {
    type Item = Result<Frame<Bytes>, io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Some(Ok(Frame::data(chunk)))),
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Type alias for the streamed body.
pub type StreamingBody = StreamBody<ReaderFrameStream>;

/// Body of every response produced by the bundled adapters.
pub type ReplyBody = Either<Full<Bytes>, StreamingBody>;

/// Build a buffered reply body.
#[inline]
pub fn full_body(bytes: impl Into<Bytes>) -> ReplyBody {
    Either::Left(Full::new(bytes.into()))
}

/// Build a streamed reply body.
#[inline]
pub fn streaming_body(reader: BoxReader) -> ReplyBody {
    Either::Right(StreamBody::new(ReaderFrameStream::new(reader)))
}
