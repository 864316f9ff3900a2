//! Buffer lifecycle helpers: deep clone, resize, construct-from-values.

use super::{codec, BufferView, ByteBuffer, Channels, ElementFormat};
use crate::util::{Error, Result};

/// Allocate a zeroed, tightly-packed view of `count` elements.
pub fn allocate(count: usize, element: ElementFormat) -> Result<BufferView> {
    let buffer = ByteBuffer::zeroed(count * element.byte_size())?;
    BufferView::whole(buffer, element)
}

/// Deep-copy `view`'s backing bytes into a new, independently owned buffer.
///
/// The returned view has the same offset, window, stride and element format;
/// the two views are thereafter unrelated.
pub fn clone_view(view: &BufferView) -> Result<BufferView> {
    let buffer = {
        let src = view.buffer().read();
        ByteBuffer::from_slice(&src)?
    };
    BufferView::new(
        buffer,
        view.byte_offset(),
        view.byte_size(),
        view.stride_bytes(),
        view.element(),
    )
}

/// Produce a new tightly-packed view of `new_count` elements at the same
/// element size.
///
/// Copies `min(new_count, old_count)` elements from the front of `view`
/// (honoring its stride); anything beyond stays zero. The input view is not
/// mutated.
pub fn resized(view: &BufferView, new_count: usize) -> Result<BufferView> {
    let element = view.element();
    let elem_size = element.byte_size();
    let buffer = ByteBuffer::zeroed(new_count * elem_size)?;
    let copy_count = new_count.min(view.num_elements());
    {
        let src = view.buffer().read();
        let mut dst = buffer.write();
        for i in 0..copy_count {
            let range = view.element_range(i as u32)?;
            dst[i * elem_size..(i + 1) * elem_size].copy_from_slice(&src[range]);
        }
    }
    BufferView::whole(buffer, element)
}

/// Encode a slice of values into a new tightly-packed view.
///
/// Fails with `FormatMismatch` when `T`'s arity differs from the element's
/// scalar count.
pub fn from_vec<T: Channels>(values: &[T], element: ElementFormat) -> Result<BufferView> {
    if T::ARITY != element.scalar_count {
        return Err(Error::mismatch(
            element.to_string(),
            format!("{}-component value", T::ARITY),
        ));
    }
    let view = allocate(values.len(), element)?;
    for (i, &value) in values.iter().enumerate() {
        codec::set(&view, i as u32, value)?;
    }
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::codec::{get, set};
    use glam::{Vec2, Vec3};

    fn uint32_view(values: &[u32]) -> BufferView {
        from_vec(values, ElementFormat::UINT32).unwrap()
    }

    #[test]
    fn test_clone_is_independent() {
        let original = uint32_view(&[1, 2, 3]);
        let copy = clone_view(&original).unwrap();
        assert!(!copy.shares_buffer(&original));
        assert_eq!(copy.num_elements(), 3);

        set(&copy, 0, 99u32).unwrap();
        assert_eq!(get::<u32>(&original, 0).unwrap(), 1);
        assert_eq!(get::<u32>(&copy, 0).unwrap(), 99);
    }

    #[test]
    fn test_resized_shrink() {
        let view = uint32_view(&[1, 2, 3, 4]);
        let smaller = resized(&view, 2).unwrap();
        assert_eq!(smaller.num_elements(), 2);
        assert_eq!(get::<u32>(&smaller, 0).unwrap(), 1);
        assert_eq!(get::<u32>(&smaller, 1).unwrap(), 2);
        // input untouched
        assert_eq!(view.num_elements(), 4);
        assert_eq!(get::<u32>(&view, 3).unwrap(), 4);
    }

    #[test]
    fn test_resized_grow_pads_with_zero() {
        let view = uint32_view(&[1, 2, 3, 4]);
        let bigger = resized(&view, 6).unwrap();
        let values: Vec<u32> = (0..6).map(|i| get::<u32>(&bigger, i).unwrap()).collect();
        assert_eq!(values, [1, 2, 3, 4, 0, 0]);
    }

    #[test]
    fn test_from_vec_exact_readback() {
        let view = from_vec(
            &[Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)],
            ElementFormat::VEC2F,
        )
        .unwrap();
        assert_eq!(view.stride_bytes(), view.element().byte_size());
        assert_eq!(get::<Vec2>(&view, 1).unwrap(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_from_vec_arity_mismatch() {
        let result = from_vec(&[Vec3::ONE], ElementFormat::VEC2F);
        assert!(matches!(result, Err(Error::FormatMismatch { .. })));
    }

    #[test]
    fn test_from_vec_empty() {
        let view = from_vec::<u32>(&[], ElementFormat::UINT32).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_resized_from_strided_source() {
        // strided source: 2 uint32 at stride 8
        let buffer = ByteBuffer::zeroed(16).unwrap();
        let strided = BufferView::new(buffer, 0, 16, 8, ElementFormat::UINT32).unwrap();
        set(&strided, 0, 7u32).unwrap();
        set(&strided, 1, 8u32).unwrap();

        let packed = resized(&strided, 3).unwrap();
        assert_eq!(packed.stride_bytes(), 4);
        assert_eq!(get::<u32>(&packed, 0).unwrap(), 7);
        assert_eq!(get::<u32>(&packed, 1).unwrap(), 8);
        assert_eq!(get::<u32>(&packed, 2).unwrap(), 0);
    }
}
