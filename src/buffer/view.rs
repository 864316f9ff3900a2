//! Shared byte storage and strided views over it.

use super::ElementFormat;
use crate::util::{Error, Result};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// A block of raw bytes shared by reference between views.
///
/// Multiple [`BufferView`]s may alias the same buffer (e.g. interleaved
/// attributes). Reads may happen concurrently; codec writes take the write
/// lock, which is what gives `set` its required exclusivity.
pub struct ByteBuffer {
    bytes: RwLock<Vec<u8>>,
}

/// Reference-counted handle to a [`ByteBuffer`].
pub type SharedByteBuffer = Arc<ByteBuffer>;

impl ByteBuffer {
    /// Allocate a zero-filled buffer of `len` bytes.
    pub fn zeroed(len: usize) -> Result<SharedByteBuffer> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailure(len))?;
        bytes.resize(len, 0);
        Ok(Arc::new(Self {
            bytes: RwLock::new(bytes),
        }))
    }

    /// Allocate a buffer holding a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Result<SharedByteBuffer> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(data.len())
            .map_err(|_| Error::AllocationFailure(data.len()))?;
        bytes.extend_from_slice(data);
        Ok(Arc::new(Self {
            bytes: RwLock::new(bytes),
        }))
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.read().len()
    }

    /// Returns true if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lock the contents for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<u8>> {
        self.bytes.read()
    }

    /// Lock the contents for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<u8>> {
        self.bytes.write()
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer").field("len", &self.len()).finish()
    }
}

/// A strided, non-owning window over a [`ByteBuffer`], interpreted according
/// to an [`ElementFormat`].
///
/// A view never allocates; cloning one is cheap and both clones alias the
/// same storage. Element `i` occupies
/// `byte_offset + i * stride_bytes .. + element.byte_size()`.
#[derive(Clone)]
pub struct BufferView {
    buffer: SharedByteBuffer,
    byte_offset: usize,
    byte_size: usize,
    stride_bytes: usize,
    element: ElementFormat,
}

impl BufferView {
    /// Create a view over a window of `buffer`.
    ///
    /// Fails unless `stride_bytes >= element.byte_size()` and the window
    /// lies within the buffer.
    pub fn new(
        buffer: SharedByteBuffer,
        byte_offset: usize,
        byte_size: usize,
        stride_bytes: usize,
        element: ElementFormat,
    ) -> Result<Self> {
        if stride_bytes < element.byte_size() {
            return Err(Error::invalid(format!(
                "stride {stride_bytes} smaller than element {element} ({} bytes)",
                element.byte_size()
            )));
        }
        let buffer_len = buffer.len();
        if byte_offset + byte_size > buffer_len {
            return Err(Error::invalid(format!(
                "window {byte_offset}+{byte_size} exceeds buffer of {buffer_len} bytes"
            )));
        }
        Ok(Self {
            buffer,
            byte_offset,
            byte_size,
            stride_bytes,
            element,
        })
    }

    /// Create a tightly-packed view over the whole of `buffer`.
    pub fn whole(buffer: SharedByteBuffer, element: ElementFormat) -> Result<Self> {
        let byte_size = buffer.len();
        Self::new(buffer, 0, byte_size, element.byte_size(), element)
    }

    /// The shared backing storage.
    #[inline]
    pub fn buffer(&self) -> &SharedByteBuffer {
        &self.buffer
    }

    /// Element format of this view.
    #[inline]
    pub fn element(&self) -> ElementFormat {
        self.element
    }

    /// Offset of the window within the buffer, in bytes.
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Size of the window, in bytes.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Distance between consecutive elements, in bytes.
    #[inline]
    pub fn stride_bytes(&self) -> usize {
        self.stride_bytes
    }

    /// Number of addressable elements in the window.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.byte_size / self.stride_bytes
    }

    /// Returns true if the view addresses no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_elements() == 0
    }

    /// Bounds predicate every codec operation evaluates before touching
    /// memory, in every build profile.
    #[inline]
    pub fn in_bounds(&self, index: u32) -> bool {
        let index = index as usize;
        index < self.num_elements()
            && index * self.stride_bytes + self.element.byte_size() <= self.byte_size
    }

    /// Returns true if `other` aliases the same backing buffer.
    pub fn shares_buffer(&self, other: &BufferView) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Absolute byte range of element `index` within the backing buffer.
    pub(crate) fn element_range(&self, index: u32) -> Result<Range<usize>> {
        if !self.in_bounds(index) {
            return Err(Error::OutOfRange {
                index: index as usize,
                count: self.num_elements(),
            });
        }
        let start = self.byte_offset + index as usize * self.stride_bytes;
        Ok(start..start + self.element.byte_size())
    }
}

impl fmt::Debug for BufferView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferView")
            .field("element", &self.element)
            .field("num_elements", &self.num_elements())
            .field("byte_offset", &self.byte_offset)
            .field("byte_size", &self.byte_size)
            .field("stride_bytes", &self.stride_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_view() {
        let buffer = ByteBuffer::zeroed(48).unwrap();
        let view = BufferView::whole(buffer, ElementFormat::VEC3F).unwrap();
        assert_eq!(view.num_elements(), 4);
        assert_eq!(view.stride_bytes(), 12);
        assert!(view.in_bounds(3));
        assert!(!view.in_bounds(4));
    }

    #[test]
    fn test_constructor_validation() {
        let buffer = ByteBuffer::zeroed(16).unwrap();
        // stride below the element size
        assert!(BufferView::new(buffer.clone(), 0, 16, 8, ElementFormat::VEC3F).is_err());
        // window past the end of the buffer
        assert!(BufferView::new(buffer.clone(), 8, 16, 12, ElementFormat::VEC3F).is_err());
        assert!(BufferView::new(buffer, 0, 12, 12, ElementFormat::VEC3F).is_ok());
    }

    #[test]
    fn test_strided_window() {
        // 2 interleaved vec3s at stride 16 starting at offset 4
        let buffer = ByteBuffer::zeroed(36).unwrap();
        let view = BufferView::new(buffer, 4, 32, 16, ElementFormat::VEC3F).unwrap();
        assert_eq!(view.num_elements(), 2);
        assert_eq!(view.element_range(1).unwrap(), 20..32);
        assert!(view.element_range(2).is_err());
    }

    #[test]
    fn test_aliasing() {
        let buffer = ByteBuffer::zeroed(24).unwrap();
        let a = BufferView::whole(buffer.clone(), ElementFormat::VEC3F).unwrap();
        let b = BufferView::whole(buffer, ElementFormat::UINT32).unwrap();
        assert!(a.shares_buffer(&b));
        assert_eq!(a.num_elements(), 2);
        assert_eq!(b.num_elements(), 6);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = ByteBuffer::zeroed(0).unwrap();
        let view = BufferView::whole(buffer, ElementFormat::UINT32).unwrap();
        assert!(view.is_empty());
        assert!(!view.in_bounds(0));
    }
}
