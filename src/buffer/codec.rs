//! The codec: conversions between a view's native encoding and float
//! vectors or dynamically tagged values.
//!
//! Every operation evaluates the view's bounds predicate before touching
//! memory and returns a typed error on arity or bounds failures; nothing in
//! here panics across the public boundary. The interchange scalar is `f64`
//! so 32-bit integer data (index buffers in particular) survives the round
//! trip bit-exactly.

use super::{BufferView, ElementFormat, ElementKind};
use crate::util::{Error, Result};
use glam::{Vec2, Vec3, Vec4};
use half::f16;

/// Value types the codec can exchange with a buffer element.
///
/// Arity must match the element's scalar count; the packed
/// [`Snorm10_10_10_2`](ElementKind::Snorm10_10_10_2) kind exposes arity 3.
pub trait Channels: Copy {
    /// Number of scalars this type carries.
    const ARITY: u8;

    /// Build a value from interchange scalars; slots past `ARITY` are zero.
    fn from_scalars(scalars: [f64; 4]) -> Self;

    /// Spread this value into interchange scalars.
    fn to_scalars(self) -> [f64; 4];
}

impl Channels for f32 {
    const ARITY: u8 = 1;
    fn from_scalars(s: [f64; 4]) -> Self {
        s[0] as f32
    }
    fn to_scalars(self) -> [f64; 4] {
        [self as f64, 0.0, 0.0, 0.0]
    }
}

impl Channels for f64 {
    const ARITY: u8 = 1;
    fn from_scalars(s: [f64; 4]) -> Self {
        s[0]
    }
    fn to_scalars(self) -> [f64; 4] {
        [self, 0.0, 0.0, 0.0]
    }
}

impl Channels for u32 {
    const ARITY: u8 = 1;
    fn from_scalars(s: [f64; 4]) -> Self {
        s[0] as u32
    }
    fn to_scalars(self) -> [f64; 4] {
        [self as f64, 0.0, 0.0, 0.0]
    }
}

impl Channels for i32 {
    const ARITY: u8 = 1;
    fn from_scalars(s: [f64; 4]) -> Self {
        s[0] as i32
    }
    fn to_scalars(self) -> [f64; 4] {
        [self as f64, 0.0, 0.0, 0.0]
    }
}

impl Channels for Vec2 {
    const ARITY: u8 = 2;
    fn from_scalars(s: [f64; 4]) -> Self {
        Vec2::new(s[0] as f32, s[1] as f32)
    }
    fn to_scalars(self) -> [f64; 4] {
        [self.x as f64, self.y as f64, 0.0, 0.0]
    }
}

impl Channels for Vec3 {
    const ARITY: u8 = 3;
    fn from_scalars(s: [f64; 4]) -> Self {
        Vec3::new(s[0] as f32, s[1] as f32, s[2] as f32)
    }
    fn to_scalars(self) -> [f64; 4] {
        [self.x as f64, self.y as f64, self.z as f64, 0.0]
    }
}

impl Channels for Vec4 {
    const ARITY: u8 = 4;
    fn from_scalars(s: [f64; 4]) -> Self {
        Vec4::new(s[0] as f32, s[1] as f32, s[2] as f32, s[3] as f32)
    }
    fn to_scalars(self) -> [f64; 4] {
        [self.x as f64, self.y as f64, self.z as f64, self.w as f64]
    }
}

/// A dynamically tagged element value, used when the attribute arity is only
/// known at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DynamicValue {
    /// One scalar; integer kinds decode exactly (f64 holds u32/i32 losslessly)
    Scalar(f64),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl DynamicValue {
    /// Number of scalars this value carries.
    pub fn arity(&self) -> u8 {
        match self {
            Self::Scalar(_) => 1,
            Self::Vec2(_) => 2,
            Self::Vec3(_) => 3,
            Self::Vec4(_) => 4,
        }
    }
}

fn check_arity(view: &BufferView, arity: u8) -> Result<()> {
    if view.element().scalar_count != arity {
        return Err(Error::mismatch(
            view.element().to_string(),
            format!("{arity}-component value"),
        ));
    }
    Ok(())
}

/// Read element `index` of `view` as a typed value.
///
/// Fails with `FormatMismatch` when `T`'s arity differs from the element's
/// scalar count and with `OutOfRange` when the bounds predicate fails.
pub fn get<T: Channels>(view: &BufferView, index: u32) -> Result<T> {
    check_arity(view, T::ARITY)?;
    let range = view.element_range(index)?;
    let data = view.buffer().read();
    Ok(T::from_scalars(decode(view.element(), &data[range])))
}

/// Write element `index` of `view` from a typed value.
///
/// Takes the buffer's write lock for the duration of the store, which is
/// what gives concurrent callers their exclusivity.
pub fn set<T: Channels>(view: &BufferView, index: u32, value: T) -> Result<()> {
    check_arity(view, T::ARITY)?;
    let range = view.element_range(index)?;
    let mut data = view.buffer().write();
    encode(view.element(), value.to_scalars(), &mut data[range]);
    Ok(())
}

/// Read element `index` of `view`, dispatching on the element's scalar count.
pub fn get_dynamic(view: &BufferView, index: u32) -> Result<DynamicValue> {
    match view.element().scalar_count {
        1 => get::<f64>(view, index).map(DynamicValue::Scalar),
        2 => get::<Vec2>(view, index).map(DynamicValue::Vec2),
        3 => get::<Vec3>(view, index).map(DynamicValue::Vec3),
        _ => get::<Vec4>(view, index).map(DynamicValue::Vec4),
    }
}

/// Write element `index` of `view` from a dynamically tagged value.
///
/// The variant must match the element's scalar count.
pub fn set_dynamic(view: &BufferView, index: u32, value: DynamicValue) -> Result<()> {
    match value {
        DynamicValue::Scalar(v) => set(view, index, v),
        DynamicValue::Vec2(v) => set(view, index, v),
        DynamicValue::Vec3(v) => set(view, index, v),
        DynamicValue::Vec4(v) => set(view, index, v),
    }
}

/// Decode one element's bytes into interchange scalars.
///
/// `bytes` is exactly `element.byte_size()` long; the packed kind is decoded
/// whole, every other kind scalar by scalar.
fn decode(element: ElementFormat, bytes: &[u8]) -> [f64; 4] {
    let mut out = [0.0f64; 4];
    match element.kind {
        ElementKind::Snorm10_10_10_2 => {
            let word = bytemuck::pod_read_unaligned::<u32>(bytes);
            let v = unpack_snorm_10_10_10_2(word);
            for c in 0..3 {
                out[c] = v[c] as f64;
            }
        }
        kind => {
            let width = kind.scalar_bytes();
            for c in 0..element.scalar_count as usize {
                out[c] = decode_scalar(kind, &bytes[c * width..(c + 1) * width]);
            }
        }
    }
    out
}

fn decode_scalar(kind: ElementKind, bytes: &[u8]) -> f64 {
    match kind {
        ElementKind::Int8 => bytes[0] as i8 as f64,
        ElementKind::Int16 => bytemuck::pod_read_unaligned::<i16>(bytes) as f64,
        ElementKind::Int32 => bytemuck::pod_read_unaligned::<i32>(bytes) as f64,
        ElementKind::UInt8 => bytes[0] as f64,
        ElementKind::UInt16 => bytemuck::pod_read_unaligned::<u16>(bytes) as f64,
        ElementKind::UInt32 => bytemuck::pod_read_unaligned::<u32>(bytes) as f64,
        ElementKind::Float32 => bytemuck::pod_read_unaligned::<f32>(bytes) as f64,
        ElementKind::Half16 => f16::from_bits(bytemuck::pod_read_unaligned::<u16>(bytes)).to_f64(),
        ElementKind::NormUInt8 => bytes[0] as f64 / 255.0,
        ElementKind::NormUInt16 => bytemuck::pod_read_unaligned::<u16>(bytes) as f64 / 65535.0,
        ElementKind::NormInt8 => bytes[0] as i8 as f64 / 127.0,
        ElementKind::NormInt16 => bytemuck::pod_read_unaligned::<i16>(bytes) as f64 / 32767.0,
        // decoded whole in `decode`; a lone scalar of it is not addressable
        ElementKind::Snorm10_10_10_2 => 0.0,
    }
}

/// Encode interchange scalars into one element's bytes.
fn encode(element: ElementFormat, scalars: [f64; 4], bytes: &mut [u8]) {
    match element.kind {
        ElementKind::Snorm10_10_10_2 => {
            let word = pack_snorm_10_10_10_2([
                scalars[0] as f32,
                scalars[1] as f32,
                scalars[2] as f32,
            ]);
            bytes.copy_from_slice(&word.to_ne_bytes());
        }
        kind => {
            let width = kind.scalar_bytes();
            for c in 0..element.scalar_count as usize {
                encode_scalar(kind, scalars[c], &mut bytes[c * width..(c + 1) * width]);
            }
        }
    }
}

fn encode_scalar(kind: ElementKind, value: f64, bytes: &mut [u8]) {
    match kind {
        // `as` saturates, so round-then-cast clamps to the kind's range
        ElementKind::Int8 => bytes[0] = (value.round() as i8) as u8,
        ElementKind::Int16 => bytes.copy_from_slice(&(value.round() as i16).to_ne_bytes()),
        ElementKind::Int32 => bytes.copy_from_slice(&(value.round() as i32).to_ne_bytes()),
        ElementKind::UInt8 => bytes[0] = value.round() as u8,
        ElementKind::UInt16 => bytes.copy_from_slice(&(value.round() as u16).to_ne_bytes()),
        ElementKind::UInt32 => bytes.copy_from_slice(&(value.round() as u32).to_ne_bytes()),
        ElementKind::Float32 => bytes.copy_from_slice(&(value as f32).to_ne_bytes()),
        // rounds to nearest half, overflow clamps to +/-inf per IEEE
        ElementKind::Half16 => bytes.copy_from_slice(&f16::from_f64(value).to_bits().to_ne_bytes()),
        ElementKind::NormUInt8 => bytes[0] = (value.clamp(0.0, 1.0) * 255.0).round() as u8,
        ElementKind::NormUInt16 => {
            bytes.copy_from_slice(&((value.clamp(0.0, 1.0) * 65535.0).round() as u16).to_ne_bytes())
        }
        ElementKind::NormInt8 => bytes[0] = ((value.clamp(-1.0, 1.0) * 127.0).round() as i8) as u8,
        ElementKind::NormInt16 => bytes
            .copy_from_slice(&((value.clamp(-1.0, 1.0) * 32767.0).round() as i16).to_ne_bytes()),
        // encoded whole in `encode`
        ElementKind::Snorm10_10_10_2 => {}
    }
}

/// Unpack three signed 10-bit fields (x in the low bits) normalized by 511.
///
/// -512/511 is below -1, so decode clamps at -1 like the stored range does
/// on the encode side.
fn unpack_snorm_10_10_10_2(word: u32) -> [f32; 3] {
    let mut out = [0.0f32; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let field = (word >> (10 * c)) & 0x3FF;
        let signed = ((field << 22) as i32) >> 22;
        *slot = (signed as f32 / 511.0).max(-1.0);
    }
    out
}

/// Pack three components into signed 10-bit fields; the 2-bit field is
/// zero-filled.
fn pack_snorm_10_10_10_2(v: [f32; 3]) -> u32 {
    let mut word = 0u32;
    for (c, &value) in v.iter().enumerate() {
        let quantized = (value.clamp(-1.0, 1.0) * 511.0).round() as i32;
        word |= ((quantized as u32) & 0x3FF) << (10 * c);
    }
    word
}
