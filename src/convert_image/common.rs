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

/// Interleaves one row of planar samples into lanes of the same width.
///
/// Arguments are the planar rows (3 or 4, each exactly `width` samples long), the sample
/// bit width and the interleaved destination (`width * planes` lanes). Returns the number
/// of leading pixels written, always a multiple of the kernel block size.
pub type RowKernel<T> = fn(&[&[T]], u32, &mut [T]) -> usize;

#[derive(Copy, Clone)]
pub enum PackKernel {
    Bytes(RowKernel<u8>),
    Words(RowKernel<u16>),
}

pub const fn max_value(bits: u32) -> u64 {
    (1_u64 << bits) - 1
}

/// Bit replication parameters to move a `bits` wide sample into a `depth` wide quantum.
///
/// A value `v` becomes `v * scale_factor + (v >> shift_factor)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthScale {
    pub scale_factor: u64,
    pub shift_factor: u32,
}

impl DepthScale {
    pub fn new(bits: u32, depth: u32) -> Self {
        if bits > depth {
            return Self::truncate(bits, depth);
        }

        let prepeat = (depth - 1) / bits;
        let pleftover = depth - bits * prepeat;

        let mut scale_factor = 0_u64;
        for _ in 0..prepeat {
            scale_factor <<= bits;
            scale_factor += 1;
        }
        scale_factor <<= pleftover;

        Self {
            scale_factor,
            shift_factor: bits - pleftover,
        }
    }

    /// Keeps the top `depth` bits of the sample.
    fn truncate(bits: u32, depth: u32) -> Self {
        Self {
            scale_factor: 0,
            shift_factor: bits - depth,
        }
    }

    #[inline(always)]
    pub fn apply(self, value: u64) -> u64 {
        value * self.scale_factor + (value >> self.shift_factor)
    }
}

/// Multiplier mapping a `depth` wide quantum back to a `bits` wide sample.
#[allow(clippy::cast_precision_loss)]
pub fn read_scale(bits: u32, depth: u32) -> f64 {
    max_value(bits) as f64 / max_value(depth) as f64
}

/// Rounds a scaled quantum to the nearest sample, saturating at `max`.
///
/// Floating point quantums can hold values just past the top of their range.
#[inline(always)]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unscale(value: f64, out_scale: f64, max: u64) -> u64 {
    ((value * out_scale + 0.5) as u64).min(max)
}
