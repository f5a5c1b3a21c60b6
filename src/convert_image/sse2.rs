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
#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

const LANE_COUNT: usize = 16;
const RGB_U8_BLOCK: usize = 2 * LANE_COUNT;
const RGBA_U8_BLOCK: usize = LANE_COUNT;
const RGB_U16_BLOCK: usize = LANE_COUNT;
const RGBA_U16_BLOCK: usize = LANE_COUNT / 2;

const fn mm_shuffle(z: i32, y: i32, x: i32, w: i32) -> i32 {
    (z << 6) | (y << 4) | (x << 2) | w
}

macro_rules! swap_middle_words {
    () => {
        mm_shuffle(3, 1, 2, 0)
    };
}

macro_rules! even_dwords {
    () => {
        mm_shuffle(2, 0, 2, 0)
    };
}

macro_rules! odd_dwords {
    () => {
        mm_shuffle(3, 1, 3, 1)
    };
}

#[inline(always)]
unsafe fn loadu<T>(ptr: *const T) -> __m128i {
    _mm_loadu_si128(ptr.cast())
}

#[inline(always)]
unsafe fn storeu<T>(ptr: *mut T, x: __m128i) {
    _mm_storeu_si128(ptr.cast(), x);
}

/// Split even and odd bytes (16-wide)
///
/// a:      a15 a14 .. a1 a0
/// b:      b15 b14 .. b1 b0
/// return: b14 .. b2 b0 a14 .. a2 a0, b15 .. b3 b1 a15 .. a3 a1
#[inline(always)]
unsafe fn unzip_i8x16(a: __m128i, b: __m128i) -> (__m128i, __m128i) {
    let mask = _mm_set1_epi16(0xFF);
    (
        _mm_packus_epi16(_mm_and_si128(a, mask), _mm_and_si128(b, mask)),
        _mm_packus_epi16(_mm_srli_epi16(a, 8), _mm_srli_epi16(b, 8)),
    )
}

/// Split even and odd words (8-wide)
///
/// a:      a7 a6 a5 a4 a3 a2 a1 a0
/// b:      b7 b6 b5 b4 b3 b2 b1 b0
/// return: b6 b4 b2 b0 a6 a4 a2 a0, b7 b5 b3 b1 a7 a5 a3 a1
#[inline(always)]
unsafe fn unzip_i16x8(a: __m128i, b: __m128i) -> (__m128i, __m128i) {
    let a = _mm_castsi128_ps(_mm_shufflehi_epi16(
        _mm_shufflelo_epi16(a, swap_middle_words!()),
        swap_middle_words!(),
    ));
    let b = _mm_castsi128_ps(_mm_shufflehi_epi16(
        _mm_shufflelo_epi16(b, swap_middle_words!()),
        swap_middle_words!(),
    ));

    (
        _mm_castps_si128(_mm_shuffle_ps(a, b, even_dwords!())),
        _mm_castps_si128(_mm_shuffle_ps(a, b, odd_dwords!())),
    )
}

/// Replicate the top bits of each word into the bits below the sample width (8-wide)
///
/// Valid for sample widths between 8 and 16 bits, where one shift pair covers all bits.
#[inline(always)]
unsafe fn upsample_i16x8(x: __m128i, shl: __m128i, shr: __m128i) -> __m128i {
    _mm_or_si128(_mm_sll_epi16(x, shl), _mm_srl_epi16(x, shr))
}

#[inline(always)]
#[allow(clippy::cast_possible_wrap)]
unsafe fn upsample_shifts(bits: u32) -> (__m128i, __m128i) {
    let bits = bits as i32;
    (
        _mm_cvtsi32_si128(16 - bits),
        _mm_cvtsi32_si128(2 * bits - 16),
    )
}

fn block_count(planes: &[&[impl Copy]], depth: usize, block: usize, dst_len: usize) -> usize {
    if planes.len() < depth {
        return 0;
    }

    let width = planes[0].len();
    let count = block * (width / block);
    if planes[..depth].iter().any(|p| p.len() < count) || dst_len < depth * count {
        return 0;
    }

    count / block
}

pub fn rgb_u8(planes: &[&[u8]], _bits: u32, dst: &mut [u8]) -> usize {
    const DEPTH: usize = 3;
    let blocks = block_count(planes, DEPTH, RGB_U8_BLOCK, dst.len());
    let (r, g, b) = match planes {
        [r, g, b, ..] => (r.as_ptr(), g.as_ptr(), b.as_ptr()),
        _ => return 0,
    };

    let out = dst.as_mut_ptr();
    for i in 0..blocks {
        let x = i * RGB_U8_BLOCK;
        unsafe {
            let r0 = loadu(r.add(x));
            let r1 = loadu(r.add(x + LANE_COUNT));
            let g0 = loadu(g.add(x));
            let g1 = loadu(g.add(x + LANE_COUNT));
            let b0 = loadu(b.add(x));
            let b1 = loadu(b.add(x + LANE_COUNT));

            let (r01a, r01b) = unzip_i8x16(r0, r1);
            let (g01a, g01b) = unzip_i8x16(g0, g1);
            let (b01a, b01b) = unzip_i8x16(b0, b1);

            let (rg0, rg2) = unzip_i8x16(r01a, g01a);
            let (gb1, gb3) = unzip_i8x16(g01b, b01b);
            let (br0, br2) = unzip_i8x16(b01a, r01b);

            let (rgbr0, rgbr1) = unzip_i8x16(rg0, br0);
            let (gbrg0, gbrg1) = unzip_i8x16(gb1, rg2);
            let (brgb0, brgb1) = unzip_i8x16(br2, gb3);

            let (r_g0, r_g1) = unzip_i8x16(rgbr0, gbrg0);
            let (b_r0, b_r1) = unzip_i8x16(brgb0, rgbr1);
            let (g_b0, g_b1) = unzip_i8x16(gbrg1, brgb1);

            let (r_r0, r_r1) = unzip_i8x16(r_g0, b_r0);
            let (g_g0, g_g1) = unzip_i8x16(g_b0, r_g1);
            let (b_b0, b_b1) = unzip_i8x16(b_r1, g_b1);

            let rgb = out.add(DEPTH * x);
            storeu(rgb, r_r0);
            storeu(rgb.add(LANE_COUNT), g_g0);
            storeu(rgb.add(2 * LANE_COUNT), b_b0);
            storeu(rgb.add(3 * LANE_COUNT), r_r1);
            storeu(rgb.add(4 * LANE_COUNT), g_g1);
            storeu(rgb.add(5 * LANE_COUNT), b_b1);
        }
    }

    blocks * RGB_U8_BLOCK
}

pub fn rgba_u8(planes: &[&[u8]], _bits: u32, dst: &mut [u8]) -> usize {
    const DEPTH: usize = 4;
    let blocks = block_count(planes, DEPTH, RGBA_U8_BLOCK, dst.len());
    let (r, g, b, a) = match planes {
        [r, g, b, a, ..] => (r.as_ptr(), g.as_ptr(), b.as_ptr(), a.as_ptr()),
        _ => return 0,
    };

    let out = dst.as_mut_ptr();
    for i in 0..blocks {
        let x = i * RGBA_U8_BLOCK;
        unsafe {
            let r0 = loadu(r.add(x));
            let g0 = loadu(g.add(x));
            let b0 = loadu(b.add(x));
            let a0 = loadu(a.add(x));

            let rg0 = _mm_unpacklo_epi8(r0, g0);
            let rg1 = _mm_unpackhi_epi8(r0, g0);
            let ba0 = _mm_unpacklo_epi8(b0, a0);
            let ba1 = _mm_unpackhi_epi8(b0, a0);

            let rgba = out.add(DEPTH * x);
            storeu(rgba, _mm_unpacklo_epi16(rg0, ba0));
            storeu(rgba.add(LANE_COUNT), _mm_unpackhi_epi16(rg0, ba0));
            storeu(rgba.add(2 * LANE_COUNT), _mm_unpacklo_epi16(rg1, ba1));
            storeu(rgba.add(3 * LANE_COUNT), _mm_unpackhi_epi16(rg1, ba1));
        }
    }

    blocks * RGBA_U8_BLOCK
}

pub fn rgb_u16(planes: &[&[u16]], bits: u32, dst: &mut [u16]) -> usize {
    const DEPTH: usize = 3;
    const WORDS: usize = LANE_COUNT / 2;
    let blocks = block_count(planes, DEPTH, RGB_U16_BLOCK, dst.len());
    let (r, g, b) = match planes {
        [r, g, b, ..] => (r.as_ptr(), g.as_ptr(), b.as_ptr()),
        _ => return 0,
    };

    let out = dst.as_mut_ptr();
    for i in 0..blocks {
        let x = i * RGB_U16_BLOCK;
        unsafe {
            let (shl, shr) = upsample_shifts(bits);
            let r0 = upsample_i16x8(loadu(r.add(x)), shl, shr);
            let r1 = upsample_i16x8(loadu(r.add(x + WORDS)), shl, shr);
            let g0 = upsample_i16x8(loadu(g.add(x)), shl, shr);
            let g1 = upsample_i16x8(loadu(g.add(x + WORDS)), shl, shr);
            let b0 = upsample_i16x8(loadu(b.add(x)), shl, shr);
            let b1 = upsample_i16x8(loadu(b.add(x + WORDS)), shl, shr);

            let (r01a, r01b) = unzip_i16x8(r0, r1);
            let (g01a, g01b) = unzip_i16x8(g0, g1);
            let (b01a, b01b) = unzip_i16x8(b0, b1);

            let (rg0, rg2) = unzip_i16x8(r01a, g01a);
            let (gb1, gb3) = unzip_i16x8(g01b, b01b);
            let (br0, br2) = unzip_i16x8(b01a, r01b);

            let (rgbr0, rgbr1) = unzip_i16x8(rg0, br0);
            let (gbrg0, gbrg1) = unzip_i16x8(gb1, rg2);
            let (brgb0, brgb1) = unzip_i16x8(br2, gb3);

            let (r_g0, r_g1) = unzip_i16x8(rgbr0, gbrg0);
            let (b_r0, b_r1) = unzip_i16x8(brgb0, rgbr1);
            let (g_b0, g_b1) = unzip_i16x8(gbrg1, brgb1);

            let rgb = out.add(DEPTH * x);
            storeu(rgb, r_g0);
            storeu(rgb.add(WORDS), b_r0);
            storeu(rgb.add(2 * WORDS), g_b0);
            storeu(rgb.add(3 * WORDS), r_g1);
            storeu(rgb.add(4 * WORDS), b_r1);
            storeu(rgb.add(5 * WORDS), g_b1);
        }
    }

    blocks * RGB_U16_BLOCK
}

pub fn rgba_u16(planes: &[&[u16]], bits: u32, dst: &mut [u16]) -> usize {
    const DEPTH: usize = 4;
    const WORDS: usize = LANE_COUNT / 2;
    let blocks = block_count(planes, DEPTH, RGBA_U16_BLOCK, dst.len());
    let (r, g, b, a) = match planes {
        [r, g, b, a, ..] => (r.as_ptr(), g.as_ptr(), b.as_ptr(), a.as_ptr()),
        _ => return 0,
    };

    let out = dst.as_mut_ptr();
    for i in 0..blocks {
        let x = i * RGBA_U16_BLOCK;
        unsafe {
            let (shl, shr) = upsample_shifts(bits);
            let r0 = upsample_i16x8(loadu(r.add(x)), shl, shr);
            let g0 = upsample_i16x8(loadu(g.add(x)), shl, shr);
            let b0 = upsample_i16x8(loadu(b.add(x)), shl, shr);
            let a0 = upsample_i16x8(loadu(a.add(x)), shl, shr);

            let rg0 = _mm_unpacklo_epi16(r0, g0);
            let rg1 = _mm_unpackhi_epi16(r0, g0);
            let ba0 = _mm_unpacklo_epi16(b0, a0);
            let ba1 = _mm_unpackhi_epi16(b0, a0);

            let rgba = out.add(DEPTH * x);
            storeu(rgba, _mm_unpacklo_epi32(rg0, ba0));
            storeu(rgba.add(WORDS), _mm_unpackhi_epi32(rg0, ba0));
            storeu(rgba.add(2 * WORDS), _mm_unpacklo_epi32(rg1, ba1));
            storeu(rgba.add(3 * WORDS), _mm_unpackhi_epi32(rg1, ba1));
        }
    }

    blocks * RGBA_U16_BLOCK
}
