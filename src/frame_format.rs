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
use crate::quantum::Quantum;
use core::fmt;

pub const MAX_NUMBER_OF_PLANES: usize = 3;

/// If a plane stride is assigned to this constant, the plane will be assumed to contain packed data
pub const STRIDE_AUTO: usize = 0;

pub const DEFAULT_STRIDES: [usize; MAX_NUMBER_OF_PLANES] = [STRIDE_AUTO; MAX_NUMBER_OF_PLANES];

/// An enumeration of supported color families.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum ColorFamily {
    /// One plane, read for the red, green and blue channels alike
    Gray,
    /// Three planes: red, green, blue
    Rgb,
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ColorFamily::Gray => write!(f, "gray"),
            ColorFamily::Rgb => write!(f, "rgb"),
        }
    }
}

/// An enumeration of planar sample types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum SampleType {
    /// Unsigned integer samples stored in 1, 2 or 4 bytes
    Integer,
    /// 32-bit floating point samples, nominal range 0 to 1
    Float,
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SampleType::Integer => write!(f, "integer"),
            SampleType::Float => write!(f, "float"),
        }
    }
}

/// Describes the planes of a frame.
///
/// # Note
/// Integer samples are stored in the smallest of 1, 2 or 4 bytes that holds
/// `bits_per_sample` bits. Float samples are always 32 bits wide.
///
/// color family          | #planes | #1    | #2    | #3
/// ----------------------|:-------:|:-----:|:-----:|:-----:
/// `ColorFamily::Gray`   | 1       | gray  |       |
/// `ColorFamily::Rgb`    | 3       | red   | green | blue
///
/// An alpha plane, when present, is carried separately and has the same sample type,
/// bit width and dimensions of the color planes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct FrameFormat {
    /// Color family
    pub color_family: ColorFamily,
    /// Sample type
    pub sample_type: SampleType,
    /// Significant bits of each sample
    pub bits_per_sample: u32,
}

impl FrameFormat {
    /// Number of color planes
    pub const fn num_planes(&self) -> usize {
        match self.color_family {
            ColorFamily::Gray => 1,
            ColorFamily::Rgb => 3,
        }
    }

    /// Storage size of a sample in bytes
    pub const fn bytes_per_sample(&self) -> usize {
        match self.sample_type {
            SampleType::Float => 4,
            SampleType::Integer => {
                if self.bits_per_sample <= 8 {
                    1
                } else if self.bits_per_sample <= 16 {
                    2
                } else {
                    4
                }
            }
        }
    }

    pub(crate) const fn is_valid(&self) -> bool {
        match self.sample_type {
            SampleType::Float => self.bits_per_sample == 32,
            SampleType::Integer => self.bits_per_sample >= 1 && self.bits_per_sample <= 32,
        }
    }

    /// Frame format able to hold an image of the given depth.
    ///
    /// * a depth of 32 bits selects float samples
    /// * a floating point quantum format, or `float_output`, selects 32-bit float samples
    /// * integer depths below 8 bits are raised to 8
    ///
    /// # Examples
    /// ```
    /// use planar_quantum as pq;
    /// use pq::{ColorFamily, FrameFormat, SampleType};
    ///
    /// let format = FrameFormat::for_image(ColorFamily::Rgb, 4, false, false);
    /// assert_eq!(format.sample_type, SampleType::Integer);
    /// assert_eq!(format.bits_per_sample, 8);
    /// ```
    pub fn for_image(
        color_family: ColorFamily,
        image_depth: u32,
        floating_point_quantum: bool,
        float_output: bool,
    ) -> Self {
        let (sample_type, bits_per_sample) =
            if float_output || floating_point_quantum || image_depth == 32 {
                (SampleType::Float, 32)
            } else {
                (SampleType::Integer, image_depth.max(8))
            };

        FrameFormat {
            color_family,
            sample_type,
            bits_per_sample,
        }
    }

    /// Same as [`for_image`], for an image stored with quantum type `Q`.
    ///
    /// # Examples
    /// ```
    /// use planar_quantum as pq;
    /// use pq::{ColorFamily, FrameFormat, HdriQ16, SampleType};
    ///
    /// let format = FrameFormat::for_quantum::<HdriQ16>(ColorFamily::Gray, 16, false);
    /// assert_eq!(format.sample_type, SampleType::Float);
    ///
    /// let format = FrameFormat::for_quantum::<u16>(ColorFamily::Gray, 10, false);
    /// assert_eq!(format.bits_per_sample, 10);
    /// ```
    ///
    /// [`for_image`]: #method.for_image
    pub fn for_quantum<Q: Quantum>(
        color_family: ColorFamily,
        image_depth: u32,
        float_output: bool,
    ) -> Self {
        Self::for_image(color_family, image_depth, Q::IS_FLOATING_POINT, float_output)
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.color_family, self.sample_type, self.bits_per_sample
        )
    }
}

pub fn get_stride(strides: &[usize], plane: usize, default_stride: usize) -> usize {
    match strides.get(plane) {
        Some(&STRIDE_AUTO) | None => default_stride,
        Some(&stride) => stride,
    }
}

pub fn get_buffers_size(
    format: &FrameFormat,
    width: u32,
    height: u32,
    strides: &[usize],
    buffers_size: &mut [usize],
) -> bool {
    let num_planes = format.num_planes();
    if strides.len() < num_planes || buffers_size.len() < num_planes {
        return false;
    }

    let default_stride = (width as usize) * format.bytes_per_sample();
    for (plane, size) in buffers_size.iter_mut().take(num_planes).enumerate() {
        *size = get_stride(strides, plane, default_stride) * (height as usize);
    }

    true
}
