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
use crate::pixel_cache::ChannelOffsets;

const fn enum_count(lo: u32, hi: u32) -> u32 {
    hi - lo + 1
}

/// Interleaved layouts with a vector kernel
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

/// Planar sample storage the kernels can move without changing the result
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LaneClass {
    /// 1-byte storage, 8 significant bits
    Exact8,
    /// 2-byte storage, 16 significant bits
    Exact16,
    /// 2-byte storage, between 9 and 15 significant bits
    Partial16,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuantumClass {
    /// Up to 16 bits
    Narrow,
    Wide,
}

const LAYOUT_COUNT: u32 = enum_count(ChannelLayout::Rgb as u32, ChannelLayout::Rgba as u32);
const LANE_COUNT: u32 = enum_count(LaneClass::Exact8 as u32, LaneClass::Partial16 as u32);
const QUANTUM_COUNT: u32 = enum_count(QuantumClass::Narrow as u32, QuantumClass::Wide as u32);

pub const TABLE_SIZE: usize = (LAYOUT_COUNT * LANE_COUNT * QUANTUM_COUNT) as usize;

pub fn get_channel_layout(
    offsets: &ChannelOffsets,
    channels: usize,
    write_alpha: bool,
) -> Option<ChannelLayout> {
    let rgb = offsets.red == 0 && offsets.green == 1 && offsets.blue == 2;
    match (channels, offsets.alpha, write_alpha) {
        (3, None, false) if rgb => Some(ChannelLayout::Rgb),
        (4, Some(3), true) if rgb => Some(ChannelLayout::Rgba),
        _ => None,
    }
}

pub fn get_lane_class(bytes_per_sample: usize, bits_per_sample: u32) -> Option<LaneClass> {
    match (bytes_per_sample, bits_per_sample) {
        (1, 8) => Some(LaneClass::Exact8),
        (2, 16) => Some(LaneClass::Exact16),
        (2, 9..=15) => Some(LaneClass::Partial16),
        _ => None,
    }
}

pub fn get_quantum_class(depth: u32) -> QuantumClass {
    if depth <= 16 {
        QuantumClass::Narrow
    } else {
        QuantumClass::Wide
    }
}

pub fn get_index(layout: ChannelLayout, lane: LaneClass, quantum: QuantumClass) -> usize {
    (((layout as u32) * LANE_COUNT + (lane as u32)) * QUANTUM_COUNT + (quantum as u32)) as usize
}
