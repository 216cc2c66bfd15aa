//! Binary buffers and typed numeric views
//!
//! A typed view never owns bytes: it points at an `ArrayBuffer` object plus
//! an offset and element count. Several views may share one buffer.

use super::ObjectRef;

/// The kind of typed view - determines element size and interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    /// Int8Array - 8-bit signed integers
    Int8,
    /// Uint8Array - 8-bit unsigned integers
    Uint8,
    /// Uint8ClampedArray - 8-bit unsigned integers (clamped)
    Uint8Clamped,
    /// Int16Array - 16-bit signed integers
    Int16,
    /// Uint16Array - 16-bit unsigned integers
    Uint16,
    /// Int32Array - 32-bit signed integers
    Int32,
    /// Uint32Array - 32-bit unsigned integers
    Uint32,
    /// Float32Array - 32-bit floating point
    Float32,
    /// Float64Array - 64-bit floating point
    Float64,
}

impl TypedArrayKind {
    /// Every kind, in declaration order
    pub const ALL: [TypedArrayKind; 9] = [
        TypedArrayKind::Int8,
        TypedArrayKind::Uint8,
        TypedArrayKind::Uint8Clamped,
        TypedArrayKind::Int16,
        TypedArrayKind::Uint16,
        TypedArrayKind::Int32,
        TypedArrayKind::Uint32,
        TypedArrayKind::Float32,
        TypedArrayKind::Float64,
    ];

    /// Get the byte size of each element
    pub fn element_size(&self) -> usize {
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => 1,
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => 2,
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 | TypedArrayKind::Float32 => 4,
            TypedArrayKind::Float64 => 8,
        }
    }

    /// Get the constructor name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
        }
    }

    /// Decode one element (little-endian). `bytes` must be `element_size()` long.
    pub(crate) fn decode(&self, bytes: &[u8]) -> f64 {
        let mut raw = [0u8; 8];
        raw[..bytes.len()].copy_from_slice(bytes);
        match self {
            TypedArrayKind::Int8 => raw[0] as i8 as f64,
            TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => raw[0] as f64,
            TypedArrayKind::Int16 => i16::from_le_bytes([raw[0], raw[1]]) as f64,
            TypedArrayKind::Uint16 => u16::from_le_bytes([raw[0], raw[1]]) as f64,
            TypedArrayKind::Int32 => i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64,
            TypedArrayKind::Uint32 => u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64,
            TypedArrayKind::Float32 => {
                f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64
            }
            TypedArrayKind::Float64 => f64::from_le_bytes(raw),
        }
    }

    /// Encode one element (little-endian) with the kind's conversion rules.
    pub(crate) fn encode(&self, value: f64) -> Vec<u8> {
        match self {
            TypedArrayKind::Int8 => vec![to_int(value) as i8 as u8],
            TypedArrayKind::Uint8 => vec![to_int(value) as u8],
            TypedArrayKind::Uint8Clamped => {
                let clamped = if value.is_nan() {
                    0.0
                } else {
                    value.clamp(0.0, 255.0).round_ties_even()
                };
                vec![clamped as u8]
            }
            TypedArrayKind::Int16 => (to_int(value) as i16).to_le_bytes().to_vec(),
            TypedArrayKind::Uint16 => (to_int(value) as u16).to_le_bytes().to_vec(),
            TypedArrayKind::Int32 => (to_int(value) as i32).to_le_bytes().to_vec(),
            TypedArrayKind::Uint32 => (to_int(value) as u32).to_le_bytes().to_vec(),
            TypedArrayKind::Float32 => (value as f32).to_le_bytes().to_vec(),
            TypedArrayKind::Float64 => value.to_le_bytes().to_vec(),
        }
    }
}

/// Modular integer conversion: truncate, then wrap into 64 bits.
fn to_int(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let truncated = value.trunc();
    (truncated % 18_446_744_073_709_551_616.0) as i128 as i64
}

/// Internal slots of a typed numeric view
#[derive(Debug, Clone)]
pub struct TypedView {
    /// The `ArrayBuffer` object backing this view
    pub buffer: ObjectRef,
    /// Element interpretation
    pub kind: TypedArrayKind,
    /// Offset into the buffer, in bytes
    pub byte_offset: usize,
    /// Number of elements
    pub length: usize,
}

impl TypedView {
    /// Length of the view in bytes (saturates for slots built by hand)
    pub fn byte_length(&self) -> usize {
        self.length.saturating_mul(self.kind.element_size())
    }
}

/// Internal slots of a `DataView`
#[derive(Debug, Clone)]
pub struct DataViewSlots {
    /// The `ArrayBuffer` object backing this view
    pub buffer: ObjectRef,
    /// Offset into the buffer, in bytes
    pub byte_offset: usize,
    /// Length of the view, in bytes
    pub byte_length: usize,
}
