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
use crate::ErrorKind;

/// Role of a channel inside an interleaved pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelChannel {
    /// Red, or gray on gray images
    Red,
    /// Green, or gray on gray images
    Green,
    /// Blue, or gray on gray images
    Blue,
    /// Alpha
    Alpha,
}

/// Position of each channel role inside an interleaved pixel, in quantums.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelOffsets {
    /// Offset of the red channel
    pub red: usize,
    /// Offset of the green channel
    pub green: usize,
    /// Offset of the blue channel
    pub blue: usize,
    /// Offset of the alpha channel, `None` if the image has no alpha
    pub alpha: Option<usize>,
}

impl ChannelOffsets {
    /// Red, green, blue
    pub const RGB: ChannelOffsets = ChannelOffsets::new(0, 1, 2, None);
    /// Red, green, blue, alpha
    pub const RGBA: ChannelOffsets = ChannelOffsets::new(0, 1, 2, Some(3));
    /// Single gray channel
    pub const GRAY: ChannelOffsets = ChannelOffsets::new(0, 0, 0, None);
    /// Gray channel followed by alpha
    pub const GRAY_ALPHA: ChannelOffsets = ChannelOffsets::new(0, 0, 0, Some(1));

    /// Creates an offset table
    pub const fn new(red: usize, green: usize, blue: usize, alpha: Option<usize>) -> Self {
        ChannelOffsets {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Offset of a channel role, `None` if the image does not carry it
    pub fn offset(&self, channel: PixelChannel) -> Option<usize> {
        match channel {
            PixelChannel::Red => Some(self.red),
            PixelChannel::Green => Some(self.green),
            PixelChannel::Blue => Some(self.blue),
            PixelChannel::Alpha => self.alpha,
        }
    }

    pub(crate) fn fits(&self, channels: usize) -> bool {
        self.red < channels
            && self.green < channels
            && self.blue < channels
            && self.alpha.map_or(true, |alpha| alpha < channels)
    }
}

/// Geometry of an interleaved pixel buffer.
pub trait PixelCache {
    /// Scalar unit of the buffer
    type Quantum: Quantum;

    /// Width of the image in pixels
    fn columns(&self) -> usize;

    /// Height of the image in pixels
    fn rows(&self) -> usize;

    /// Number of quantums per pixel
    fn channels(&self) -> usize;

    /// Position of each channel role inside a pixel
    fn offsets(&self) -> ChannelOffsets;
}

/// Row cache of a writable interleaved pixel buffer.
///
/// A row is prepared with [`get`], written through [`pixels_mut`] and pushed to the
/// backing image with [`sync`]. Within a pass, rows are visited in increasing order;
/// preparing row 0 starts a new pass. Use [`RowWriter`] to pair every `get` with exactly
/// one `sync`.
///
/// [`get`]: #tymethod.get
/// [`pixels_mut`]: #tymethod.pixels_mut
/// [`sync`]: #tymethod.sync
/// [`RowWriter`]: ./struct.RowWriter.html
pub trait PixelCacheMut: PixelCache {
    /// Prepares row `y` for writing
    fn get(&mut self, y: usize);

    /// Quantums of the prepared row, `columns() * channels()` long
    fn pixels_mut(&mut self) -> &mut [Self::Quantum];

    /// Commits the prepared row
    fn sync(&mut self);
}

/// Read access to a populated interleaved pixel buffer.
pub trait PixelCacheRef: PixelCache {
    /// Quantums of row `y`, `columns() * channels()` long
    fn row(&self, y: usize) -> &[Self::Quantum];
}

/// Writable view of one row. The row is committed when the view is dropped.
pub struct RowWriter<'a, C: PixelCacheMut + ?Sized> {
    cache: &'a mut C,
}

impl<'a, C: PixelCacheMut + ?Sized> RowWriter<'a, C> {
    /// Prepares row `y` of `cache`
    pub fn new(cache: &'a mut C, y: usize) -> Self {
        cache.get(y);
        RowWriter { cache }
    }

    /// Quantums of the row
    pub fn pixels(&mut self) -> &mut [C::Quantum] {
        self.cache.pixels_mut()
    }
}

impl<C: PixelCacheMut + ?Sized> Drop for RowWriter<'_, C> {
    fn drop(&mut self) {
        self.cache.sync();
    }
}

/// In-memory interleaved image.
///
/// Writes go through a single row cache which is copied back on sync, the same contract
/// a codec pixel cache offers. A new image has every color channel at zero and alpha,
/// when present, fully opaque.
///
/// # Examples
/// ```
/// use planar_quantum as pq;
/// use pq::{PackedImage, PixelCache, PixelCacheRef};
///
/// let image = PackedImage::<u16>::rgba(4, 2);
/// assert_eq!(image.channels(), 4);
/// assert_eq!(image.row(1)[3], u16::MAX);
/// ```
#[derive(Clone, Debug)]
pub struct PackedImage<Q: Quantum> {
    columns: usize,
    rows: usize,
    channels: usize,
    offsets: ChannelOffsets,
    data: Vec<Q>,
    cache: Vec<Q>,
    cached_row: Option<usize>,
    next_row: usize,
    commits: usize,
}

impl<Q: Quantum> PackedImage<Q> {
    /// Creates an image with a custom channel layout
    ///
    /// # Errors
    ///
    /// * [`InvalidValue`] if `channels` is zero
    ///
    /// * [`InvalidOperation`] if one of the offsets does not fall inside a pixel
    ///
    /// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
    /// [`InvalidOperation`]: ./enum.ErrorKind.html#variant.InvalidOperation
    pub fn new(
        columns: usize,
        rows: usize,
        channels: usize,
        offsets: ChannelOffsets,
    ) -> Result<Self, ErrorKind> {
        if channels == 0 {
            return Err(ErrorKind::InvalidValue);
        }

        if !offsets.fits(channels) {
            return Err(ErrorKind::InvalidOperation);
        }

        Ok(Self::build(columns, rows, channels, offsets))
    }

    /// Creates an image with red, green and blue channels
    pub fn rgb(columns: usize, rows: usize) -> Self {
        Self::build(columns, rows, 3, ChannelOffsets::RGB)
    }

    /// Creates an image with red, green, blue and alpha channels
    pub fn rgba(columns: usize, rows: usize) -> Self {
        Self::build(columns, rows, 4, ChannelOffsets::RGBA)
    }

    /// Creates an image with a gray channel
    pub fn gray(columns: usize, rows: usize) -> Self {
        Self::build(columns, rows, 1, ChannelOffsets::GRAY)
    }

    /// Creates an image with a gray channel and alpha
    pub fn gray_alpha(columns: usize, rows: usize) -> Self {
        Self::build(columns, rows, 2, ChannelOffsets::GRAY_ALPHA)
    }

    fn build(columns: usize, rows: usize, channels: usize, offsets: ChannelOffsets) -> Self {
        let row_len = columns * channels;
        let mut data = vec![Q::default(); row_len * rows];
        if let Some(alpha) = offsets.alpha {
            let opaque = Q::from_f32(Q::quantum_range());
            for pixel in data.chunks_exact_mut(channels) {
                pixel[alpha] = opaque;
            }
        }

        PackedImage {
            columns,
            rows,
            channels,
            offsets,
            data,
            cache: vec![Q::default(); row_len],
            cached_row: None,
            next_row: 0,
            commits: 0,
        }
    }

    /// All quantums, row after row
    pub fn data(&self) -> &[Q] {
        &self.data
    }

    /// All quantums, row after row, for direct population
    pub fn data_mut(&mut self) -> &mut [Q] {
        &mut self.data
    }

    /// Quantums of the pixel at `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> &[Q] {
        let start = (y * self.columns + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Number of rows committed since the image was created
    pub fn commits(&self) -> usize {
        self.commits
    }

    fn row_range(&self, y: usize) -> core::ops::Range<usize> {
        let row_len = self.columns * self.channels;
        y * row_len..(y + 1) * row_len
    }
}

impl<Q: Quantum> PixelCache for PackedImage<Q> {
    type Quantum = Q;

    fn columns(&self) -> usize {
        self.columns
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn offsets(&self) -> ChannelOffsets {
        self.offsets
    }
}

impl<Q: Quantum> PixelCacheMut for PackedImage<Q> {
    fn get(&mut self, y: usize) {
        debug_assert!(self.cached_row.is_none(), "previous row was not synced");
        if y == 0 {
            self.next_row = 0;
        }
        debug_assert!(y >= self.next_row, "rows must be written in increasing order");

        let range = self.row_range(y);
        self.cache.copy_from_slice(&self.data[range]);
        self.cached_row = Some(y);
    }

    fn pixels_mut(&mut self) -> &mut [Q] {
        &mut self.cache
    }

    fn sync(&mut self) {
        if let Some(y) = self.cached_row.take() {
            let range = self.row_range(y);
            self.data[range].copy_from_slice(&self.cache);
            self.next_row = y + 1;
            self.commits += 1;
        }
    }
}

impl<Q: Quantum> PixelCacheRef for PackedImage<Q> {
    fn row(&self, y: usize) -> &[Q] {
        &self.data[self.row_range(y)]
    }
}
