// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
use crate::convert_image::common::{max_value, PackKernel, RowKernel};
use bytemuck::Pod;
use core::fmt;

/// Scalar unit of an interleaved pixel buffer.
///
/// The bit width of a quantum, its depth, is a property of the type: every channel of
/// every pixel stored with the same quantum type has the same depth.
///
/// | type        | depth | storage |
/// |-------------|:-----:|---------|
/// | `u8`        | 8     | integer |
/// | `u16`       | 16    | integer |
/// | `u32`       | 32    | integer |
/// | [`HdriQ8`]  | 8     | `f32`   |
/// | [`HdriQ16`] | 16    | `f32`   |
/// | [`HdriQ32`] | 32    | `f32`   |
pub trait Quantum: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Bit width of the quantum
    const DEPTH: u32;

    /// True when the quantum holds floating point values
    const IS_FLOATING_POINT: bool;

    /// Largest value an integer quantum of the same depth can hold
    fn quantum_range() -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let range = max_value(Self::DEPTH) as f32;
        range
    }

    /// Stores an integer value. Integer quantums keep the low `DEPTH` bits.
    fn from_bits(value: u64) -> Self;

    /// Stores a floating point value. Integer quantums saturate.
    fn from_f32(value: f32) -> Self;

    /// Value of the quantum as single precision float
    fn to_f32(self) -> f32;

    /// Value of the quantum as double precision float
    fn to_f64(self) -> f64;
}

macro_rules! integer_quantum {
    ($type:ty, $depth:expr) => {
        impl Quantum for $type {
            const DEPTH: u32 = $depth;
            const IS_FLOATING_POINT: bool = false;

            #[inline(always)]
            #[allow(clippy::cast_possible_truncation)]
            fn from_bits(value: u64) -> Self {
                value as $type
            }

            #[inline(always)]
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn from_f32(value: f32) -> Self {
                value as $type
            }

            #[inline(always)]
            #[allow(clippy::cast_precision_loss)]
            fn to_f32(self) -> f32 {
                self as f32
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }
        }
    };
}

integer_quantum!(u8, 8);
integer_quantum!(u16, 16);
integer_quantum!(u32, 32);

/// Floating point quantum holding values in `0..=2^DEPTH - 1`.
///
/// `D` must be in `1..=32`; other depths fail to compile once the quantum is used.
///
/// ```compile_fail
/// use planar_quantum::{Hdri, Quantum};
///
/// let depth = <Hdri<64> as Quantum>::DEPTH;
/// ```
#[derive(Copy, Clone, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Hdri<const D: u32>(pub f32);

/// 8-bit floating point quantum
pub type HdriQ8 = Hdri<8>;
/// 16-bit floating point quantum
pub type HdriQ16 = Hdri<16>;
/// 32-bit floating point quantum
pub type HdriQ32 = Hdri<32>;

impl<const D: u32> Hdri<D> {
    #[allow(clippy::manual_range_contains)]
    const VALID_DEPTH: () = assert!(D >= 1 && D <= 32, "Hdri depth must be in 1..=32");
}

impl<const D: u32> fmt::Debug for Hdri<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}q{}", self.0, D)
    }
}

impl<const D: u32> Quantum for Hdri<D> {
    #[allow(clippy::let_unit_value)]
    const DEPTH: u32 = {
        let () = Self::VALID_DEPTH;
        D
    };
    const IS_FLOATING_POINT: bool = true;

    #[inline(always)]
    #[allow(clippy::cast_precision_loss)]
    fn from_bits(value: u64) -> Self {
        Hdri(value as f32)
    }

    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        Hdri(value)
    }

    #[inline(always)]
    fn to_f32(self) -> f32 {
        self.0
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        f64::from(self.0)
    }
}

/// Integer sample of a planar frame
pub trait Sample: Pod + Default + Send + Sync {
    const STORAGE_BITS: u32;

    fn to_bits(self) -> u64;

    /// Keeps the low bits that fit the sample
    fn from_bits(value: u64) -> Self;

    /// Row kernel matching this sample storage, if any
    fn row_kernel(kernel: PackKernel) -> Option<RowKernel<Self>>;
}

impl Sample for u8 {
    const STORAGE_BITS: u32 = 8;

    #[inline(always)]
    fn to_bits(self) -> u64 {
        u64::from(self)
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)]
    fn from_bits(value: u64) -> Self {
        value as u8
    }

    fn row_kernel(kernel: PackKernel) -> Option<RowKernel<Self>> {
        match kernel {
            PackKernel::Bytes(f) => Some(f),
            PackKernel::Words(_) => None,
        }
    }
}

impl Sample for u16 {
    const STORAGE_BITS: u32 = 16;

    #[inline(always)]
    fn to_bits(self) -> u64 {
        u64::from(self)
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)]
    fn from_bits(value: u64) -> Self {
        value as u16
    }

    fn row_kernel(kernel: PackKernel) -> Option<RowKernel<Self>> {
        match kernel {
            PackKernel::Words(f) => Some(f),
            PackKernel::Bytes(_) => None,
        }
    }
}

impl Sample for u32 {
    const STORAGE_BITS: u32 = 32;

    #[inline(always)]
    fn to_bits(self) -> u64 {
        u64::from(self)
    }

    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)]
    fn from_bits(value: u64) -> Self {
        value as u32
    }

    fn row_kernel(_kernel: PackKernel) -> Option<RowKernel<Self>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantum_ranges() {
        assert_eq!(u8::quantum_range(), 255.0);
        assert_eq!(u16::quantum_range(), 65535.0);
        assert_eq!(HdriQ16::quantum_range(), 65535.0);
        assert_eq!(u32::quantum_range(), 4_294_967_295_u32 as f32);
    }

    #[test]
    fn integer_quantums_truncate() {
        assert_eq!(<u8 as Quantum>::from_bits(0x1FF), 0xFF);
        assert_eq!(<u16 as Quantum>::from_bits(0x1_2345), 0x2345);
        assert_eq!(<u8 as Quantum>::from_f32(300.0), 255);
        assert_eq!(<u8 as Quantum>::from_f32(-1.0), 0);
    }

    #[test]
    fn hdri_keeps_fraction() {
        let q = HdriQ8::from_f32(127.5);
        assert_eq!(q.to_f32(), 127.5);
        assert_eq!(HdriQ16::from_bits(65535).0, 65535.0);
        assert_eq!(format!("{:?}", HdriQ8::from_bits(3)), "3q8");
    }

    #[test]
    fn hdri_depths() {
        assert_eq!(HdriQ8::DEPTH, 8);
        assert_eq!(HdriQ32::DEPTH, 32);
        assert_eq!(Hdri::<1>::quantum_range(), 1.0);
        assert!(HdriQ16::IS_FLOATING_POINT);
        assert!(!u16::IS_FLOATING_POINT);
    }
}
