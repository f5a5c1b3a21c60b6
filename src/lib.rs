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
#![warn(missing_docs)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(
    clippy::too_many_arguments, // API design
    clippy::missing_safety_doc, // Until we add them...
    clippy::similar_names, // This requires effort to ensure
    // Kernels rely on intrinsics being inlined into a single body
    clippy::inline_always,
    // Yield false positives
    clippy::must_use_candidate,
)]

//! Planar quantum is a library to move pixels between planar frame buffers and
//! interleaved pixel buffers made of quantums.
//!
//! A planar frame keeps one plane per channel (gray, or red, green and blue), plus an
//! optional alpha plane. Samples are unsigned integers of 1 to 32 significant bits, stored
//! in 1, 2 or 4 bytes, or 32-bit floats with nominal range 0 to 1.
//!
//! An interleaved image is made of quantums, whose bit width is fixed by the quantum type:
//!
//! | Quantum type | Depth | Storage        |
//! | ------------ | ----- | -------------- |
//! | `u8`         | 8     | integer        |
//! | `u16`        | 16    | integer        |
//! | `u32`        | 32    | integer        |
//! | `HdriQ8`     | 8     | floating point |
//! | `HdriQ16`    | 16    | floating point |
//! | `HdriQ32`    | 32    | floating point |
//!
//! Integer samples narrower than the quantum are widened by bit replication, so that zero
//! maps to zero and full scale maps to full scale. Samples wider than the quantum keep their
//! most significant bits. Reading back rounds to the nearest sample value.
//!
//! # Examples
//!
//! Write a 4-bit gray frame into an 8-bit image:
//! ```
//! use planar_quantum as pq;
//! use pq::{write_image, ColorFamily, FrameFormat, PackedImage, SampleType};
//! use std::error;
//!
//! fn write() -> Result<(), Box<dyn error::Error>> {
//!     let format = FrameFormat {
//!         color_family: ColorFamily::Gray,
//!         sample_type: SampleType::Integer,
//!         bits_per_sample: 4,
//!     };
//!
//!     let gray = [0x0_u8, 0x5, 0xA, 0xF];
//!     let mut image = PackedImage::<u8>::gray(4, 1);
//!     write_image(4, 1, &format, None, &[&gray[..]], None, &mut image)?;
//!     assert_eq!(image.data(), &[0x00, 0x55, 0xAA, 0xFF]);
//!
//!     Ok(())
//! }
//! # write().unwrap();
//! ```
//!
//! Read an image back, including its alpha channel:
//! ```
//! use planar_quantum as pq;
//! use pq::{read_image, AlphaPlaneMut, ColorFamily, FrameFormat, PackedImage, SampleType};
//! use pq::STRIDE_AUTO;
//! use std::error;
//!
//! fn read() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 640;
//!     const HEIGHT: u32 = 480;
//!     const SIZE: usize = (WIDTH as usize) * (HEIGHT as usize);
//!
//!     let format = FrameFormat {
//!         color_family: ColorFamily::Rgb,
//!         sample_type: SampleType::Integer,
//!         bits_per_sample: 8,
//!     };
//!
//!     let image = PackedImage::<u16>::rgba(WIDTH as usize, HEIGHT as usize);
//!     let mut red = vec![0_u8; SIZE];
//!     let mut green = vec![0_u8; SIZE];
//!     let mut blue = vec![0_u8; SIZE];
//!     let mut alpha = vec![0_u8; SIZE];
//!
//!     read_image(
//!         WIDTH,
//!         HEIGHT,
//!         &format,
//!         None,
//!         &mut [&mut red[..], &mut green[..], &mut blue[..]],
//!         Some(AlphaPlaneMut {
//!             buffer: &mut alpha[..],
//!             stride: STRIDE_AUTO,
//!         }),
//!         &image,
//!     )?;
//!
//!     // A new image is fully opaque
//!     assert!(alpha.iter().all(|&a| a == 0xFF));
//!
//!     Ok(())
//! }
//! # read().unwrap();
//! ```
//!
//! Compute how many bytes are needed to store the planes of a frame:
//! ```
//! use planar_quantum as pq;
//! use pq::{get_buffers_size, ColorFamily, FrameFormat, SampleType};
//! use std::error;
//!
//! fn compute_size() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 640;
//!     const HEIGHT: u32 = 480;
//!
//!     let format = FrameFormat {
//!         color_family: ColorFamily::Rgb,
//!         sample_type: SampleType::Integer,
//!         bits_per_sample: 10,
//!     };
//!
//!     let sizes: &mut [usize] = &mut [0_usize; 3];
//!     get_buffers_size(WIDTH, HEIGHT, &format, None, sizes)?;
//!     assert_eq!(sizes[0], 2 * 640 * 480);
//!
//!     Ok(())
//! }
//! # compute_size().unwrap();
//! ```
//!
//! Provide image strides to write data which is not tightly packed:
//! ```
//! use planar_quantum as pq;
//! use pq::{write_image, AlphaPlane, ColorFamily, FrameFormat, PackedImage, SampleType};
//! use std::error;
//!
//! fn write() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 3;
//!     const HEIGHT: u32 = 2;
//!     const STRIDE: usize = 4;
//!
//!     let format = FrameFormat {
//!         color_family: ColorFamily::Gray,
//!         sample_type: SampleType::Integer,
//!         bits_per_sample: 8,
//!     };
//!
//!     let gray = [1_u8, 2, 3, 0, 4, 5, 6, 0];
//!     let alpha = [7_u8, 7, 7, 0, 7, 7, 7, 0];
//!     let mut image = PackedImage::<u8>::gray_alpha(WIDTH as usize, HEIGHT as usize);
//!
//!     write_image(
//!         WIDTH,
//!         HEIGHT,
//!         &format,
//!         Some(&[STRIDE]),
//!         &[&gray[..]],
//!         Some(AlphaPlane {
//!             buffer: &alpha[..],
//!             stride: STRIDE,
//!         }),
//!         &mut image,
//!     )?;
//!
//!     assert_eq!(image.pixel(2, 1), &[6, 7]);
//!
//!     Ok(())
//! }
//! # write().unwrap();
//! ```
mod convert_image;
mod cpu_info;
mod dispatcher;
mod frame_format;
mod pixel_cache;
mod quantum;

use bytemuck::Pod;
use convert_image::common::{PackKernel, RowKernel};
use convert_image::x86::{self, DestinationPlanes, SourcePlanes};
use cpu_info::{CpuManufacturer, InstructionSet};
use log::{debug, trace};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use paste::paste;
use quantum::Sample;
use std::error;
use std::fmt;
use std::mem::size_of;
#[cfg(feature = "test_instruction_sets")]
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::OnceLock;

pub use frame_format::{ColorFamily, FrameFormat, SampleType, STRIDE_AUTO};
pub use pixel_cache::{
    ChannelOffsets, PackedImage, PixelCache, PixelCacheMut, PixelCacheRef, PixelChannel,
    RowWriter,
};
pub use quantum::{Hdri, HdriQ16, HdriQ32, HdriQ8, Quantum};

/// An enumeration of errors.
#[derive(Debug)]
#[repr(C)]
pub enum ErrorKind {
    /// One or more parameters have invalid values for the called function
    InvalidValue,
    /// The combination of parameters is unsupported for the called function
    InvalidOperation,
    /// Not enough data was provided to the called function. Typically, provided
    /// arrays are not correctly sized
    NotEnoughData,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::InvalidValue => write!(
                f,
                "One or more parameters have not legal values for the command"
            ),
            ErrorKind::InvalidOperation => write!(
                f,
                "The combination of parameters is not legal for the command"
            ),
            ErrorKind::NotEnoughData => write!(f, "Not enough data provided"),
        }
    }
}

#[cfg(not(tarpaulin_include))]
impl error::Error for ErrorKind {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

/// Alpha plane read by [`write_image`].
///
/// Same sample type, bit width and dimensions of the color planes.
///
/// [`write_image`]: ./fn.write_image.html
pub struct AlphaPlane<'a> {
    /// Plane samples
    pub buffer: &'a [u8],
    /// Distance in bytes between two rows, or [`STRIDE_AUTO`]
    ///
    /// [`STRIDE_AUTO`]: ./constant.STRIDE_AUTO.html
    pub stride: usize,
}

/// Alpha plane filled by [`read_image`].
///
/// Same sample type, bit width and dimensions of the color planes.
///
/// [`read_image`]: ./fn.read_image.html
pub struct AlphaPlaneMut<'a> {
    /// Plane samples
    pub buffer: &'a mut [u8],
    /// Distance in bytes between two rows, or [`STRIDE_AUTO`]
    ///
    /// [`STRIDE_AUTO`]: ./constant.STRIDE_AUTO.html
    pub stride: usize,
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
macro_rules! pack_kernel {
    ($table:expr, $set:ident, $layout:ident, $lane:ident, $quantum:ident, $storage:ident, $sample:ident) => {
        paste! {
            $table[dispatcher::get_index(
                dispatcher::ChannelLayout::$layout,
                dispatcher::LaneClass::$lane,
                dispatcher::QuantumClass::$quantum,
            )] = Some(PackKernel::$storage(convert_image::$set::[<$layout:lower _ $sample>]))
        }
    };
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
macro_rules! set_dispatch_table {
    ($table:expr, $set:ident) => {
        pack_kernel!($table, $set, Rgb, Exact8, Narrow, Bytes, u8);
        pack_kernel!($table, $set, Rgb, Exact8, Wide, Bytes, u8);
        pack_kernel!($table, $set, Rgb, Exact16, Narrow, Words, u16);
        pack_kernel!($table, $set, Rgb, Exact16, Wide, Words, u16);
        pack_kernel!($table, $set, Rgb, Partial16, Narrow, Words, u16);
        pack_kernel!($table, $set, Rgba, Exact8, Narrow, Bytes, u8);
        pack_kernel!($table, $set, Rgba, Exact8, Wide, Bytes, u8);
        pack_kernel!($table, $set, Rgba, Exact16, Narrow, Words, u16);
        pack_kernel!($table, $set, Rgba, Exact16, Wide, Words, u16);
        pack_kernel!($table, $set, Rgba, Partial16, Narrow, Words, u16);
    };
}

#[cfg(feature = "test_instruction_sets")]
static TEST_SET: AtomicI32 = AtomicI32::new(-1);

type KernelTable = [Option<PackKernel>; dispatcher::TABLE_SIZE];

struct Context {
    manufacturer: CpuManufacturer,
    set: InstructionSet,
    kernels: KernelTable,
    #[cfg(feature = "test_instruction_sets")]
    test_kernels: [Option<KernelTable>; 2],
}

impl Context {
    pub fn global() -> &'static Context {
        static INSTANCE: OnceLock<Context> = OnceLock::new();
        INSTANCE.get_or_init(Context::new)
    }

    #[cfg_attr(
        not(any(target_arch = "x86", target_arch = "x86_64")),
        allow(unused_mut)
    )]
    pub fn new() -> Self {
        let (manufacturer, set) = cpu_info::get();
        let mut context = Context {
            manufacturer,
            set,
            kernels: [None; dispatcher::TABLE_SIZE],
            #[cfg(feature = "test_instruction_sets")]
            test_kernels: [None; 2],
        };

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        match context.set {
            InstructionSet::X86 => {}
            InstructionSet::Sse2 => {
                set_dispatch_table!(context.kernels, sse2);

                #[cfg(feature = "test_instruction_sets")]
                {
                    context.test_kernels[0] = Some([None; dispatcher::TABLE_SIZE]);
                    context.test_kernels[1] = Some(context.kernels);
                }
            }
        }

        debug!(
            "cpu-manufacturer: {:?}, instruction-set: {:?}",
            context.manufacturer, context.set
        );

        context
    }

    fn kernels(&self) -> &KernelTable {
        #[cfg(feature = "test_instruction_sets")]
        {
            // Checked: we want the invalid value '-1' to be mapped outside the valid range
            #[allow(clippy::cast_sign_loss)]
            let index = TEST_SET.load(Ordering::SeqCst) as usize;
            if let Some(Some(table)) = self.test_kernels.get(index) {
                return table;
            }
        }

        &self.kernels
    }
}

/// Returns a description of the algorithms that are best for the running cpu and
/// available instruction sets
///
/// # Examples
/// ```
/// use planar_quantum as pq;
/// pq::initialize();
/// println!("{}", pq::describe_acceleration());
/// // => {cpu-manufacturer:Intel,instruction-set:Sse2}
/// ```
pub fn describe_acceleration() -> String {
    let state = Context::global();

    format!(
        "{{cpu-manufacturer:{:?},instruction-set:{:?}}}",
        state.manufacturer, state.set
    )
}

/// Detects the running cpu and selects the conversion kernels.
///
/// Calling it is optional: the first conversion does the same. It is safe to call it
/// more than once, from any thread.
pub fn initialize() {
    Context::global();
}

/// Forces the kernels of a given instruction set, `"x86"` (scalar) or `"sse2"`.
///
/// Any other name restores the kernels selected for the running cpu.
#[cfg(feature = "test_instruction_sets")]
pub fn initialize_with_instruction_set(instruction_set: &str) {
    match instruction_set {
        "x86" => TEST_SET.store(0, Ordering::SeqCst),
        "sse2" => TEST_SET.store(1, Ordering::SeqCst),
        _ => TEST_SET.store(-1, Ordering::SeqCst),
    };
}

/// Compute number of bytes required to store the planes of a frame.
///
/// # Arguments
/// * `width` - Width of the frame in pixels
/// * `height` - Height of the frame in pixels
/// * `format` - Frame format
/// * `strides` - An array of distances in bytes between starts of consecutive lines
///               in each plane
/// * `buffers_size` - An array describing the minimum number of bytes required in each
///                    plane
///
/// # Errors
///
/// * [`InvalidValue`] if the frame format is not valid
///
/// * [`NotEnoughData`] if the strides array is not `None` and its length is less than the
///   frame format number of planes
///
/// * [`NotEnoughData`] if the buffers size array is smaller than the frame format number
///   of planes
///
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
pub fn get_buffers_size(
    width: u32,
    height: u32,
    format: &FrameFormat,
    strides: Option<&[usize]>,
    buffers_size: &mut [usize],
) -> Result<(), ErrorKind> {
    if !format.is_valid() {
        return Err(ErrorKind::InvalidValue);
    }

    if frame_format::get_buffers_size(
        format,
        width,
        height,
        strides.unwrap_or(&frame_format::DEFAULT_STRIDES),
        buffers_size,
    ) {
        Ok(())
    } else {
        Err(ErrorKind::NotEnoughData)
    }
}

/// Row stride in samples and bytes needed by a plane.
fn plane_extent(
    width: usize,
    height: usize,
    sample_size: usize,
    stride: usize,
) -> Result<(usize, usize), ErrorKind> {
    let row = width
        .checked_mul(sample_size)
        .ok_or(ErrorKind::InvalidValue)?;
    let stride = if stride == STRIDE_AUTO { row } else { stride };
    if stride < row || stride % sample_size != 0 {
        return Err(ErrorKind::InvalidValue);
    }

    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|x| x.checked_add(row))
        .ok_or(ErrorKind::NotEnoughData)?;

    Ok((stride / sample_size, needed))
}

fn source_plane<T: Pod>(
    buffer: &[u8],
    stride: usize,
    width: usize,
    height: usize,
) -> Result<(&[T], usize), ErrorKind> {
    let (stride, needed) = plane_extent(width, height, size_of::<T>(), stride)?;
    let bytes = buffer.get(..needed).ok_or(ErrorKind::NotEnoughData)?;
    let samples = bytemuck::try_cast_slice(bytes).map_err(|_| ErrorKind::InvalidValue)?;

    Ok((samples, stride))
}

fn destination_plane<T: Pod>(
    buffer: &mut [u8],
    stride: usize,
    width: usize,
    height: usize,
) -> Result<(&mut [T], usize), ErrorKind> {
    let (stride, needed) = plane_extent(width, height, size_of::<T>(), stride)?;
    let bytes = buffer.get_mut(..needed).ok_or(ErrorKind::NotEnoughData)?;
    let samples = bytemuck::try_cast_slice_mut(bytes).map_err(|_| ErrorKind::InvalidValue)?;

    Ok((samples, stride))
}

fn source_planes<'a, T: Pod>(
    width: usize,
    height: usize,
    format: &FrameFormat,
    strides: &[usize],
    buffers: &[&'a [u8]],
    alpha: Option<AlphaPlane<'a>>,
) -> Result<SourcePlanes<'a, T>, ErrorKind> {
    let mut planes = [(&[][..], 0); 3];
    for (plane, &buffer) in buffers.iter().take(format.num_planes()).enumerate() {
        planes[plane] = source_plane(buffer, strides[plane], width, height)?;
    }

    if format.color_family == ColorFamily::Gray {
        planes[1] = planes[0];
        planes[2] = planes[0];
    }

    let alpha = match alpha {
        Some(alpha) => Some(source_plane(alpha.buffer, alpha.stride, width, height)?),
        None => None,
    };

    Ok(SourcePlanes { planes, alpha })
}

fn destination_planes<'a, T: Pod>(
    width: usize,
    height: usize,
    format: &FrameFormat,
    strides: &[usize],
    buffers: &'a mut [&mut [u8]],
    alpha: Option<AlphaPlaneMut<'a>>,
) -> Result<DestinationPlanes<'a, T>, ErrorKind> {
    let num_planes = format.num_planes();
    let mut planes = Vec::with_capacity(num_planes);
    for (plane, buffer) in buffers.iter_mut().take(num_planes).enumerate() {
        planes.push(destination_plane(buffer, strides[plane], width, height)?);
    }

    let alpha = match alpha {
        Some(alpha) => Some(destination_plane(alpha.buffer, alpha.stride, width, height)?),
        None => None,
    };

    Ok(DestinationPlanes { planes, alpha })
}

/// Checks a frame against the image it is moved to or from.
fn check_frame<C: PixelCache + ?Sized>(
    width: u32,
    height: u32,
    format: &FrameFormat,
    strides: &[usize],
    buffers: usize,
    image: &C,
) -> Result<(), ErrorKind> {
    if !format.is_valid() {
        return Err(ErrorKind::InvalidValue);
    }

    if image.columns() != width as usize || image.rows() != height as usize {
        return Err(ErrorKind::InvalidValue);
    }

    let channels = image.channels();
    if channels == 0 || !image.offsets().fits(channels) {
        return Err(ErrorKind::InvalidOperation);
    }

    let num_planes = format.num_planes();
    if buffers < num_planes || strides.len() < num_planes {
        return Err(ErrorKind::NotEnoughData);
    }

    Ok(())
}

fn select_kernel<T: Sample>(
    format: &FrameFormat,
    offsets: &ChannelOffsets,
    channels: usize,
    write_alpha: bool,
    depth: u32,
) -> Option<RowKernel<T>> {
    let layout = dispatcher::get_channel_layout(offsets, channels, write_alpha)?;
    let lane = dispatcher::get_lane_class(format.bytes_per_sample(), format.bits_per_sample)?;
    let quantum = dispatcher::get_quantum_class(depth);
    let kernel = Context::global().kernels()[dispatcher::get_index(layout, lane, quantum)]?;

    T::row_kernel(kernel)
}

fn write_integer_image<T: Sample, C: PixelCacheMut + ?Sized>(
    width: usize,
    height: usize,
    format: &FrameFormat,
    strides: &[usize],
    buffers: &[&[u8]],
    alpha: Option<AlphaPlane>,
    image: &mut C,
) -> Result<(), ErrorKind> {
    let src = source_planes::<T>(width, height, format, strides, buffers, alpha)?;

    let offsets = image.offsets();
    let write_alpha = src.alpha.is_some() && offsets.alpha.is_some();
    let depth = <C::Quantum as Quantum>::DEPTH;
    let kernel = select_kernel::<T>(format, &offsets, image.channels(), write_alpha, depth);
    trace!(
        "write {} {}x{} to q{}: {}",
        format,
        width,
        height,
        depth,
        if kernel.is_some() { "vector" } else { "scalar" }
    );

    x86::pack_planes(width, height, format.bits_per_sample, &src, image, kernel);
    Ok(())
}

/// Writes a planar frame into an interleaved image.
///
/// Integer samples are widened (or narrowed) to the quantum depth by bit replication,
/// float samples are multiplied by the quantum range. The alpha plane, if any, is written
/// only when the image has an alpha channel; without an alpha plane the image alpha
/// channel is left untouched.
///
/// # Arguments
/// * `width` - Width of the frame in pixels
/// * `height` - Height of the frame in pixels
/// * `format` - Frame format
/// * `strides` - An array of distances in bytes between starts of consecutive lines
///               in each plane
/// * `buffers` - An array of planes, one for gray frames, red, green and blue otherwise
/// * `alpha` - Optional alpha plane
/// * `image` - Interleaved image, rows are written in increasing order
///
/// # Errors
///
/// * [`InvalidValue`] if the frame format is not valid
///
/// * [`InvalidValue`] if `width` or `height` differ from the image size
///
/// * [`InvalidValue`] if a stride is smaller than a row, or not a multiple of the sample
///   size
///
/// * [`InvalidValue`] if a plane is not aligned to its sample size
///
/// * [`InvalidOperation`] if the image channel offsets do not fall inside a pixel
///
/// * [`NotEnoughData`] if the buffers or strides arrays are smaller than the frame format
///   number of planes
///
/// * [`NotEnoughData`] if a plane is smaller than its size computed by
///   [`get_buffers_size`]
///
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`InvalidOperation`]: ./enum.ErrorKind.html#variant.InvalidOperation
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
/// [`get_buffers_size`]: ./fn.get_buffers_size.html
pub fn write_image<C: PixelCacheMut + ?Sized>(
    width: u32,
    height: u32,
    format: &FrameFormat,
    strides: Option<&[usize]>,
    buffers: &[&[u8]],
    alpha: Option<AlphaPlane>,
    image: &mut C,
) -> Result<(), ErrorKind> {
    let strides = strides.unwrap_or(&frame_format::DEFAULT_STRIDES);
    check_frame(width, height, format, strides, buffers.len(), image)?;

    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Ok(());
    }

    match (format.sample_type, format.bytes_per_sample()) {
        (SampleType::Float, _) => {
            let src = source_planes::<f32>(width, height, format, strides, buffers, alpha)?;
            trace!("write {} {}x{}: scalar", format, width, height);
            x86::pack_float_planes(width, height, &src, image);
            Ok(())
        }
        (SampleType::Integer, 1) => {
            write_integer_image::<u8, C>(width, height, format, strides, buffers, alpha, image)
        }
        (SampleType::Integer, 2) => {
            write_integer_image::<u16, C>(width, height, format, strides, buffers, alpha, image)
        }
        (SampleType::Integer, _) => {
            write_integer_image::<u32, C>(width, height, format, strides, buffers, alpha, image)
        }
    }
}

/// Reads an interleaved image into a planar frame.
///
/// Quantums are scaled to the sample bit width and rounded to the nearest integer, or
/// divided by the quantum range for float samples. Gray frames receive the red channel.
/// When an alpha plane is requested but the image has no alpha channel, the alpha plane
/// is filled with zeros.
///
/// # Arguments
/// * `width` - Width of the frame in pixels
/// * `height` - Height of the frame in pixels
/// * `format` - Frame format
/// * `strides` - An array of distances in bytes between starts of consecutive lines
///               in each plane
/// * `buffers` - An array of planes, one for gray frames, red, green and blue otherwise
/// * `alpha` - Optional alpha plane
/// * `image` - Interleaved image
///
/// # Errors
///
/// Same as [`write_image`].
///
/// [`write_image`]: ./fn.write_image.html
pub fn read_image<C: PixelCacheRef + ?Sized>(
    width: u32,
    height: u32,
    format: &FrameFormat,
    strides: Option<&[usize]>,
    buffers: &mut [&mut [u8]],
    alpha: Option<AlphaPlaneMut>,
    image: &C,
) -> Result<(), ErrorKind> {
    let strides = strides.unwrap_or(&frame_format::DEFAULT_STRIDES);
    check_frame(width, height, format, strides, buffers.len(), image)?;

    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Ok(());
    }

    trace!("read {} {}x{}: scalar", format, width, height);
    let bits = format.bits_per_sample;
    match (format.sample_type, format.bytes_per_sample()) {
        (SampleType::Float, _) => {
            let mut dst =
                destination_planes::<f32>(width, height, format, strides, buffers, alpha)?;
            x86::unpack_float_planes(width, height, image, &mut dst);
        }
        (SampleType::Integer, 1) => {
            let mut dst = destination_planes::<u8>(width, height, format, strides, buffers, alpha)?;
            x86::unpack_integer_planes(width, height, bits, image, &mut dst);
        }
        (SampleType::Integer, 2) => {
            let mut dst =
                destination_planes::<u16>(width, height, format, strides, buffers, alpha)?;
            x86::unpack_integer_planes(width, height, bits, image, &mut dst);
        }
        (SampleType::Integer, _) => {
            let mut dst =
                destination_planes::<u32>(width, height, format, strides, buffers, alpha)?;
            x86::unpack_integer_planes(width, height, bits, image, &mut dst);
        }
    }

    Ok(())
}
