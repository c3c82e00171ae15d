//! Bounds-checked access to a received link-layer frame.
//!
//! Every read and write goes through [`Frame::ensure`] first. An access that
//! would cross the validated length fails with [`FrameError::Truncated`] and
//! touches nothing, which is the only memory-safety rule the per-frame path
//! has to obey.

use crate::core::FrameError;

/// One received frame: a byte buffer, its validated length and the interface
/// it arrived on.
///
/// The validated length may be shorter than the buffer (a capped receive
/// buffer holding a short frame); bytes past it are never read or written.
#[derive(Debug)]
pub struct Frame<'a> {
    buf: &'a mut [u8],
    len: usize,
    ifindex: u32,
}

impl<'a> Frame<'a> {
    /// Wrap a whole buffer as a frame received on `ifindex`.
    pub fn new(buf: &'a mut [u8], ifindex: u32) -> Self {
        let len = buf.len();
        Self { buf, len, ifindex }
    }

    /// Wrap a buffer whose first `len` bytes hold the frame.
    ///
    /// `len` is clamped to the buffer size.
    pub fn with_len(buf: &'a mut [u8], len: usize, ifindex: u32) -> Self {
        let len = len.min(buf.len());
        Self { buf, len, ifindex }
    }

    /// Validated frame length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the frame holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Interface the frame was received on.
    pub fn ifindex(&self) -> u32 {
        self.ifindex
    }

    /// Check that `end` bytes are present.
    #[inline]
    pub fn ensure(&self, end: usize) -> Result<(), FrameError> {
        if end > self.len {
            return Err(FrameError::Truncated {
                needed: end,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Copy `N` bytes starting at `offset`.
    pub fn load<const N: usize>(&self, offset: usize) -> Result<[u8; N], FrameError> {
        let end = offset.checked_add(N).ok_or(FrameError::Truncated {
            needed: usize::MAX,
            len: self.len,
        })?;
        self.ensure(end)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[offset..end]);
        Ok(out)
    }

    /// Overwrite bytes starting at `offset`.
    pub fn store(&mut self, offset: usize, bytes: &[u8]) -> Result<(), FrameError> {
        let end = offset.checked_add(bytes.len()).ok_or(FrameError::Truncated {
            needed: usize::MAX,
            len: self.len,
        })?;
        self.ensure(end)?;
        self.buf[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Read one byte.
    pub fn load_u8(&self, offset: usize) -> Result<u8, FrameError> {
        let [b] = self.load::<1>(offset)?;
        Ok(b)
    }

    /// Read a big-endian `u16`.
    pub fn load_be16(&self, offset: usize) -> Result<u16, FrameError> {
        self.load::<2>(offset).map(u16::from_be_bytes)
    }

    /// Read a big-endian `u32`.
    pub fn load_be32(&self, offset: usize) -> Result<u32, FrameError> {
        self.load::<4>(offset).map(u32::from_be_bytes)
    }

    /// Write a big-endian `u16`.
    pub fn store_be16(&mut self, offset: usize, value: u16) -> Result<(), FrameError> {
        self.store(offset, &value.to_be_bytes())
    }
}
