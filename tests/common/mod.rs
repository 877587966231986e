//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Reader that hands out `data` in pre-cut segments, one segment per read.
pub struct SegmentReader {
    segments: VecDeque<Vec<u8>>,
}

impl SegmentReader {
    pub fn new(segments: Vec<Vec<u8>>) -> Self {
        Self {
            segments: segments.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    /// Delivers `data` at most `step` bytes at a time.
    pub fn with_step(data: &[u8], step: usize) -> Self {
        Self::new(data.chunks(step).map(|c| c.to_vec()).collect())
    }

    /// Delivers `data` in two reads split at `at`.
    pub fn split_at(data: &[u8], at: usize) -> Self {
        let (head, tail) = data.split_at(at);
        Self::new(vec![head.to_vec(), tail.to_vec()])
    }
}

impl AsyncRead for SegmentReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if let Some(mut segment) = self.segments.pop_front() {
            let n = segment.len().min(buf.remaining());
            buf.put_slice(&segment[..n]);
            if n < segment.len() {
                segment.drain(..n);
                self.segments.push_front(segment);
            }
        }
        Poll::Ready(Ok(()))
    }
}

/// Reader that yields `data` and then fails instead of reporting EOF.
pub struct FailingReader {
    data: Option<Vec<u8>>,
}

impl FailingReader {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: Some(data.to_vec()),
        }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.data.take() {
            Some(mut data) => {
                let n = data.len().min(buf.remaining());
                buf.put_slice(&data[..n]);
                data.drain(..n);
                if !data.is_empty() {
                    self.data = Some(data);
                }
                Poll::Ready(Ok(()))
            }
            None => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
        }
    }
}
