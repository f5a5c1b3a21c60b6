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
use crate::convert_image::common::{max_value, read_scale, unscale, DepthScale, RowKernel};
use crate::pixel_cache::{ChannelOffsets, PixelCacheMut, PixelCacheRef, RowWriter};
use crate::quantum::{Quantum, Sample};

/// Planes read by the write path. Strides are in samples.
///
/// Gray frames repeat the same plane for red, green and blue.
pub struct SourcePlanes<'a, T> {
    pub planes: [(&'a [T], usize); 3],
    pub alpha: Option<(&'a [T], usize)>,
}

/// Planes filled by the read path. Strides are in samples.
///
/// Gray frames have a single plane, filled from the red channel.
pub struct DestinationPlanes<'a, T> {
    pub planes: Vec<(&'a mut [T], usize)>,
    pub alpha: Option<(&'a mut [T], usize)>,
}

fn row<'a, T>(plane: &(&'a [T], usize), y: usize, width: usize) -> &'a [T] {
    let (samples, stride) = *plane;
    &samples[y * stride..y * stride + width]
}

fn row_mut<'a, T>(plane: &'a mut (&mut [T], usize), y: usize, width: usize) -> &'a mut [T] {
    let stride = plane.1;
    &mut plane.0[y * stride..y * stride + width]
}

/// Scatters one row of planar samples into interleaved pixels, from column `start` on.
#[inline(always)]
fn pack_row<T: Copy, Q: Quantum, F: Fn(T) -> Q>(
    start: usize,
    rgb: [&[T]; 3],
    alpha: Option<(&[T], usize)>,
    offsets: &ChannelOffsets,
    channels: usize,
    pixels: &mut [Q],
    convert: F,
) {
    let [r, g, b] = rgb;
    let width = r.len();
    for (x, pixel) in pixels
        .chunks_exact_mut(channels)
        .enumerate()
        .take(width)
        .skip(start)
    {
        pixel[offsets.red] = convert(r[x]);
        pixel[offsets.green] = convert(g[x]);
        pixel[offsets.blue] = convert(b[x]);
        if let Some((a, offset)) = alpha {
            pixel[offset] = convert(a[x]);
        }
    }
}

/// Writes integer planes into an interleaved image.
///
/// When a row kernel is given, it interleaves the leading pixels of each row into lanes
/// as wide as the sample storage, which are then replicated up (or truncated down) to the
/// quantum depth. The remaining pixels follow the scalar formula.
pub fn pack_planes<T: Sample, C: PixelCacheMut + ?Sized>(
    width: usize,
    height: usize,
    bits: u32,
    src: &SourcePlanes<T>,
    image: &mut C,
    kernel: Option<RowKernel<T>>,
) {
    let depth = <C::Quantum as Quantum>::DEPTH;
    let scale = DepthScale::new(bits, depth);
    let lane_scale = DepthScale::new(T::STORAGE_BITS, depth);

    let channels = image.channels();
    let offsets = image.offsets();
    let alpha = src.alpha.and_then(|a| offsets.alpha.map(|offset| (a, offset)));

    let mut lanes = match kernel {
        Some(_) => vec![T::default(); width * channels],
        None => Vec::new(),
    };

    for y in 0..height {
        let rgb = [
            row(&src.planes[0], y, width),
            row(&src.planes[1], y, width),
            row(&src.planes[2], y, width),
        ];
        let a = alpha.map(|(plane, offset)| (row(&plane, y, width), offset));

        let mut writer = RowWriter::new(&mut *image, y);
        let pixels = writer.pixels();

        let mut done = 0;
        if let Some(kernel) = kernel {
            done = match a {
                Some((a, _)) => kernel(&[rgb[0], rgb[1], rgb[2], a], bits, &mut lanes),
                None => kernel(&rgb, bits, &mut lanes),
            };

            let count = done * channels;
            for (quantum, &lane) in pixels[..count].iter_mut().zip(&lanes[..count]) {
                *quantum = C::Quantum::from_bits(lane_scale.apply(lane.to_bits()));
            }
        }

        pack_row(done, rgb, a, &offsets, channels, pixels, |v: T| {
            C::Quantum::from_bits(scale.apply(v.to_bits()))
        });
    }
}

/// Writes 32-bit float planes into an interleaved image.
pub fn pack_float_planes<C: PixelCacheMut + ?Sized>(
    width: usize,
    height: usize,
    src: &SourcePlanes<f32>,
    image: &mut C,
) {
    let range = C::Quantum::quantum_range();
    let channels = image.channels();
    let offsets = image.offsets();
    let alpha = src.alpha.and_then(|a| offsets.alpha.map(|offset| (a, offset)));

    for y in 0..height {
        let rgb = [
            row(&src.planes[0], y, width),
            row(&src.planes[1], y, width),
            row(&src.planes[2], y, width),
        ];
        let a = alpha.map(|(plane, offset)| (row(&plane, y, width), offset));

        let mut writer = RowWriter::new(&mut *image, y);
        pack_row(0, rgb, a, &offsets, channels, writer.pixels(), |v: f32| {
            C::Quantum::from_f32(v * range)
        });
    }
}

fn unpack_planes<T: Copy + Default, C: PixelCacheRef + ?Sized, F: Fn(C::Quantum) -> T>(
    width: usize,
    height: usize,
    image: &C,
    dst: &mut DestinationPlanes<T>,
    convert: F,
) {
    let channels = image.channels();
    let offsets = image.offsets();
    let roles = [offsets.red, offsets.green, offsets.blue];

    for y in 0..height {
        let pixels = image.row(y);
        for (plane, &offset) in dst.planes.iter_mut().zip(&roles) {
            let samples = row_mut(plane, y, width);
            for (sample, pixel) in samples.iter_mut().zip(pixels.chunks_exact(channels)) {
                *sample = convert(pixel[offset]);
            }
        }

        if let Some(plane) = dst.alpha.as_mut() {
            let samples = row_mut(plane, y, width);
            match offsets.alpha {
                Some(offset) => {
                    for (sample, pixel) in samples.iter_mut().zip(pixels.chunks_exact(channels)) {
                        *sample = convert(pixel[offset]);
                    }
                }
                None => samples.fill(T::default()),
            }
        }
    }
}

/// Reads an interleaved image into integer planes.
pub fn unpack_integer_planes<T: Sample, C: PixelCacheRef + ?Sized>(
    width: usize,
    height: usize,
    bits: u32,
    image: &C,
    dst: &mut DestinationPlanes<T>,
) {
    let out_scale = read_scale(bits, <C::Quantum as Quantum>::DEPTH);
    let max = max_value(bits);
    unpack_planes(width, height, image, dst, |q: C::Quantum| {
        T::from_bits(unscale(q.to_f64(), out_scale, max))
    });
}

/// Reads an interleaved image into 32-bit float planes.
pub fn unpack_float_planes<C: PixelCacheRef + ?Sized>(
    width: usize,
    height: usize,
    image: &C,
    dst: &mut DestinationPlanes<f32>,
) {
    let range = C::Quantum::quantum_range();
    unpack_planes(width, height, image, dst, |q: C::Quantum| q.to_f32() / range);
}
