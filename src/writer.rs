use crate::buffer::{FrameError, LengthPrefixedBuffer, OverflowPolicy};
use crate::frame::SizedFrame;
use crate::wrapper::{FrameIo, FrameWrapper};
use std::io;
use thiserror::Error;
use tracing::trace;

#[cfg(any(feature = "futures-io", feature = "tokio-io"))]
use async_trait::async_trait;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to finalize frame")]
    Frame(#[from] FrameError),
    #[error("io error while writing frame")]
    IoFail(#[from] io::Error),
}

pub type WriteResult<P> = Result<P, WriteError>;

#[cfg(any(feature = "futures-io", feature = "tokio-io"))]
#[async_trait]
pub trait FrameAsyncWriter {
    async fn write_frame_async(&mut self, frame: &SizedFrame) -> WriteResult<()>;

    async fn write_frame_with_async<F>(&mut self, fill: F) -> WriteResult<()>
    where
        F: FnOnce(&mut LengthPrefixedBuffer) -> io::Result<()> + Send;
}

pub trait FrameSyncWriter {
    fn write_frame(&mut self, frame: &SizedFrame) -> WriteResult<()>;

    /// Fill a fresh payload through `fill`, then write the synced frame in
    /// one piece. Nothing reaches the sink if `fill` fails.
    fn write_frame_with<F>(&mut self, fill: F) -> WriteResult<()>
    where
        F: FnOnce(&mut LengthPrefixedBuffer) -> io::Result<()>;
}

/// Writes length-prefixed frames to `W`, reusing one staging buffer for
/// payloads built in place.
///
/// The staging buffer keeps the capacity of the largest frame built so far.
/// Call [`shrink_staging_to`](Self::shrink_staging_to) after an unusually
/// large frame to hand that memory back.
pub struct FrameWriter<W> {
    inner: W,
    buf: LengthPrefixedBuffer,
}

impl<W> FrameWrapper<W> for FrameWriter<W> {
    fn into_inner(self) -> W {
        self.inner
    }
}

impl<W> FrameIo for FrameWriter<W> {
    fn set_overflow_policy(&mut self, policy: OverflowPolicy) {
        self.buf.set_overflow_policy(policy);
    }
}

impl<W> FrameSyncWriter for FrameWriter<W>
where
    W: io::Write,
{
    fn write_frame(&mut self, frame: &SizedFrame) -> WriteResult<()> {
        trace!(payload_len = frame.payload_len(), "writing frame");
        frame.write_to(&mut self.inner)?;
        Ok(())
    }

    fn write_frame_with<F>(&mut self, fill: F) -> WriteResult<()>
    where
        F: FnOnce(&mut LengthPrefixedBuffer) -> io::Result<()>,
    {
        write_data_to_target_sync(self.prepare_frame_in_buf(fill)?)?;
        Ok(())
    }
}

fn write_data_to_target_sync<'a, W>(tuple: (&'a [u8], &'a mut W)) -> Result<(), io::Error>
where
    W: io::Write,
{
    let (data, target) = tuple;
    target.write_all(data)
}

#[cfg(any(feature = "futures-io", feature = "tokio-io"))]
#[async_trait]
impl<W> FrameAsyncWriter for FrameWriter<W>
where
    W: AsyncWriteExact,
{
    async fn write_frame_async(&mut self, frame: &SizedFrame) -> WriteResult<()> {
        trace!(payload_len = frame.payload_len(), "writing frame");
        self.inner.write_all(frame.as_bytes()).await?;
        Ok(())
    }

    async fn write_frame_with_async<F>(&mut self, fill: F) -> WriteResult<()>
    where
        F: FnOnce(&mut LengthPrefixedBuffer) -> io::Result<()> + Send,
    {
        let (data, target) = self.prepare_frame_in_buf(fill)?;
        target.write_all(data).await?;
        Ok(())
    }
}

#[cfg(any(feature = "futures-io", feature = "tokio-io"))]
#[async_trait]
pub trait AsyncWriteExact: Unpin + Sync + Send {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), io::Error>;
}

#[cfg(all(feature = "futures-io", not(feature = "tokio-io")))]
#[async_trait]
impl<W> AsyncWriteExact for W
where
    W: futures::AsyncWrite + Unpin + Sync + Send,
{
    async fn write_all(&mut self, data: &[u8]) -> Result<(), io::Error> {
        futures::AsyncWriteExt::write_all(self, data).await
    }
}

#[cfg(feature = "tokio-io")]
#[async_trait]
impl<W> AsyncWriteExact for W
where
    W: tokio::io::AsyncWrite + Unpin + Sync + Send,
{
    async fn write_all(&mut self, data: &[u8]) -> Result<(), io::Error> {
        tokio::io::AsyncWriteExt::write_all(self, data).await
    }
}

impl<W> FrameWriter<W> {
    pub fn wrap(inner: W) -> Self {
        Self::wrap_with_policy(inner, OverflowPolicy::default())
    }

    pub fn wrap_with_policy(inner: W, policy: OverflowPolicy) -> Self {
        Self {
            inner,
            buf: LengthPrefixedBuffer::with_capacity_and_policy(0, policy),
        }
    }

    pub fn staging_capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn shrink_staging_to(&mut self, min_capacity: usize) {
        self.buf.shrink_to(min_capacity);
    }

    fn prepare_frame_in_buf<F>(&mut self, fill: F) -> WriteResult<(&[u8], &mut W)>
    where
        F: FnOnce(&mut LengthPrefixedBuffer) -> io::Result<()>,
    {
        self.buf.reset();
        fill(&mut self.buf)?;
        self.buf.sync_length_prefix()?;
        trace!(payload_len = self.buf.payload_len(), "writing frame");

        Ok((self.buf.to_bytes()?, &mut self.inner))
    }
}
