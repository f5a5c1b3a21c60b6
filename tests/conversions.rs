#![warn(unused)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
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
    clippy::too_many_lines, // This requires effort to handle
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp,
)]

mod common;

use common::{float_format, integer_format, replicate, Plane};
use itertools::iproduct;
use planar_quantum as pq;
use pq::{
    read_image, write_image, AlphaPlane, AlphaPlaneMut, ColorFamily, HdriQ16, HdriQ32, HdriQ8,
    PackedImage, PixelCacheRef, Quantum, STRIDE_AUTO,
};
use rand::Rng;

const MAX_WIDTH: u32 = 49;
const MAX_HEIGHT: u32 = 4;
const MAX_PAD: usize = 3;

fn sample_size(bits: u32) -> usize {
    if bits <= 8 {
        1
    } else if bits <= 16 {
        2
    } else {
        4
    }
}

/// Quantum holding `value` replicated from `bits` to the quantum depth.
fn expected<Q: Quantum>(value: u64, bits: u32) -> f64 {
    Q::from_bits(replicate(value, bits, Q::DEPTH)).to_f64()
}

/// Every value for narrow samples, random values plus both ends otherwise.
fn gray_values(bits: u32) -> Vec<u64> {
    let max = (1_u64 << bits) - 1;
    if bits <= 12 {
        return (0..=max).collect();
    }

    let mut rng = rand::thread_rng();
    let mut values: Vec<u64> = (0..4096).map(|_| rng.gen_range(0..=max)).collect();
    values.push(0);
    values.push(max);
    values
}

fn write_gray<Q: Quantum>(bits: u32, values: &[u64]) -> PackedImage<Q> {
    let width = values.len() as u32;
    let plane = Plane::from_samples(values, sample_size(bits));
    let mut image = PackedImage::<Q>::gray(values.len(), 1);

    assert!(write_image(
        width,
        1,
        &integer_format(ColorFamily::Gray, bits),
        None,
        &[plane.bytes()],
        None,
        &mut image,
    )
    .is_ok());

    image
}

fn read_gray<Q: Quantum>(bits: u32, image: &PackedImage<Q>) -> Vec<u64> {
    let size = sample_size(bits);
    let mut plane = Plane::new(size * image.data().len());

    assert!(read_image(
        image.data().len() as u32,
        1,
        &integer_format(ColorFamily::Gray, bits),
        None,
        &mut [plane.bytes_mut()],
        None,
        image,
    )
    .is_ok());

    plane.samples(size)
}

fn gray_replicate_ok<Q: Quantum>() {
    for bits in 1..=32 {
        let values = gray_values(bits);
        let image = write_gray::<Q>(bits, &values);

        for (&q, &v) in image.data().iter().zip(&values) {
            assert_eq!(q.to_f64(), expected::<Q>(v, bits));
        }
    }
}

fn gray_round_trip_ok<Q: Quantum>(max_bits: u32) {
    for bits in 1..=max_bits {
        let values = gray_values(bits);
        let image = write_gray::<Q>(bits, &values);
        let samples = read_gray(bits, &image);

        for (&sample, &v) in samples.iter().zip(&values) {
            if bits == Q::DEPTH {
                assert_eq!(sample, v);
            } else {
                assert!(sample.max(v) - sample.min(v) <= 1);
            }
        }
    }
}

fn rgb_write_ok<Q: Quantum>(bits: u32, with_alpha: bool) {
    let size = sample_size(bits);
    let max = (1_u64 << bits) - 1;
    let format = integer_format(ColorFamily::Rgb, bits);
    let channels = if with_alpha { 4 } else { 3 };
    let mut rng = rand::thread_rng();

    for (width, height, pad) in iproduct!(0..=MAX_WIDTH, 0..=MAX_HEIGHT, 0..MAX_PAD) {
        let w = width as usize;
        let h = height as usize;
        let stride = w + pad;
        let strides = if pad == 0 { STRIDE_AUTO } else { size * stride };

        let values: Vec<Vec<u64>> = (0..channels)
            .map(|_| (0..stride * h).map(|_| rng.gen_range(0..=max)).collect())
            .collect();
        let planes: Vec<Plane> = values.iter().map(|v| Plane::from_samples(v, size)).collect();

        let mut image = if with_alpha {
            PackedImage::<Q>::rgba(w, h)
        } else {
            PackedImage::<Q>::rgb(w, h)
        };

        let alpha = planes.get(3).map(|plane| AlphaPlane {
            buffer: plane.bytes(),
            stride: strides,
        });

        assert!(write_image(
            width,
            height,
            &format,
            Some(&[strides; 3]),
            &[planes[0].bytes(), planes[1].bytes(), planes[2].bytes()],
            alpha,
            &mut image,
        )
        .is_ok());

        for (y, x) in iproduct!(0..h, 0..w) {
            let pixel = image.pixel(x, y);
            for (channel, plane) in values.iter().enumerate() {
                assert_eq!(
                    pixel[channel].to_f64(),
                    expected::<Q>(plane[y * stride + x], bits)
                );
            }
        }
    }
}

fn rgb_ok() {
    for (&bits, with_alpha) in iproduct!(&[5, 8, 10, 12, 16, 24], [false, true]) {
        rgb_write_ok::<u8>(bits, with_alpha);
        rgb_write_ok::<u16>(bits, with_alpha);
        rgb_write_ok::<u32>(bits, with_alpha);
        rgb_write_ok::<HdriQ16>(bits, with_alpha);
        rgb_write_ok::<HdriQ32>(bits, with_alpha);
    }
}

fn hdri_ok() {
    gray_replicate_ok::<HdriQ8>();
    gray_replicate_ok::<HdriQ16>();
    gray_replicate_ok::<HdriQ32>();

    gray_round_trip_ok::<HdriQ8>(8);
    gray_round_trip_ok::<HdriQ16>(16);
    // 32-bit quantums in single precision keep 24 significant bits
    gray_round_trip_ok::<HdriQ32>(24);

    // Rounding past full scale still reads back as full scale
    let values = [0, 1, 0xFFFF_FFF0, u64::from(u32::MAX)];
    let image = write_gray::<HdriQ32>(32, &values);
    assert_eq!(image.data()[3].0, 4_294_967_296.0);
    assert_eq!(read_gray(32, &image), [0, 1, u64::from(u32::MAX), u64::from(u32::MAX)]);
}

fn reuse_ok() {
    let format = integer_format(ColorFamily::Gray, 8);
    let mut image = PackedImage::<u8>::gray(2, 2);

    for frame in [[1_u64, 2, 3, 4], [5, 6, 7, 8]] {
        let plane = Plane::from_samples(&frame, 1);
        assert!(write_image(2, 2, &format, None, &[plane.bytes()], None, &mut image).is_ok());
    }

    assert_eq!(image.data(), &[5, 6, 7, 8]);
    assert_eq!(image.commits(), 4);
}

fn alpha_ok() {
    const WIDTH: u32 = 37;
    const HEIGHT: u32 = 3;
    const SIZE: usize = (WIDTH as usize) * (HEIGHT as usize);

    let format = integer_format(ColorFamily::Rgb, 8);
    let mut rng = rand::thread_rng();
    let values: Vec<u64> = (0..SIZE).map(|_| rng.gen_range(0..=255)).collect();
    let plane = Plane::from_samples(&values, 1);
    let alpha = Plane::from_samples(&values.iter().map(|v| 255 - v).collect::<Vec<_>>(), 1);

    // Missing alpha plane leaves the canvas opaque
    let mut image = PackedImage::<u16>::rgba(WIDTH as usize, HEIGHT as usize);
    assert!(write_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &[plane.bytes(), plane.bytes(), plane.bytes()],
        None,
        &mut image,
    )
    .is_ok());
    assert!(image.data().chunks_exact(4).all(|pixel| pixel[3] == u16::MAX));

    // Supplied alpha is reproduced
    assert!(write_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &[plane.bytes(), plane.bytes(), plane.bytes()],
        Some(AlphaPlane {
            buffer: alpha.bytes(),
            stride: STRIDE_AUTO,
        }),
        &mut image,
    )
    .is_ok());

    let mut red = Plane::new(SIZE);
    let mut green = Plane::new(SIZE);
    let mut blue = Plane::new(SIZE);
    let mut read_alpha = Plane::new(SIZE);
    assert!(read_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &mut [red.bytes_mut(), green.bytes_mut(), blue.bytes_mut()],
        Some(AlphaPlaneMut {
            buffer: read_alpha.bytes_mut(),
            stride: STRIDE_AUTO,
        }),
        &image,
    )
    .is_ok());
    assert_eq!(red.samples(1), values);
    assert_eq!(blue.samples(1), values);
    assert_eq!(read_alpha.bytes(), alpha.bytes());

    // Alpha is ignored by images without an alpha channel
    let mut image = PackedImage::<u8>::rgb(WIDTH as usize, HEIGHT as usize);
    assert!(write_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &[plane.bytes(), plane.bytes(), plane.bytes()],
        Some(AlphaPlane {
            buffer: alpha.bytes(),
            stride: STRIDE_AUTO,
        }),
        &mut image,
    )
    .is_ok());
    assert_eq!(image.pixel(5, 1), &[values[42] as u8; 3][..]);

    // Reading alpha from an image without alpha gives zeros
    read_alpha.bytes_mut().iter_mut().for_each(|a| *a = 0xFF);
    assert!(read_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &mut [red.bytes_mut(), green.bytes_mut(), blue.bytes_mut()],
        Some(AlphaPlaneMut {
            buffer: read_alpha.bytes_mut(),
            stride: STRIDE_AUTO,
        }),
        &image,
    )
    .is_ok());
    assert!(read_alpha.bytes().iter().all(|&a| a == 0));
    assert_eq!(green.samples(1), values);
}

fn gray_ok() {
    const WIDTH: u32 = 19;
    const HEIGHT: u32 = 2;
    const SIZE: usize = (WIDTH as usize) * (HEIGHT as usize);

    let mut rng = rand::thread_rng();
    let values: Vec<u64> = (0..SIZE).map(|_| rng.gen_range(0..1024)).collect();
    let gray = Plane::from_samples(&values, 2);

    // A gray frame feeds every color channel
    let mut image = PackedImage::<u16>::rgb(WIDTH as usize, HEIGHT as usize);
    assert!(write_image(
        WIDTH,
        HEIGHT,
        &integer_format(ColorFamily::Gray, 10),
        None,
        &[gray.bytes()],
        None,
        &mut image,
    )
    .is_ok());

    for (pixel, &v) in image.data().chunks_exact(3).zip(&values) {
        let expected = replicate(v, 10, 16) as u16;
        assert_eq!(pixel, &[expected; 3][..]);
    }

    // A gray frame reads the red channel
    for pixel in image.data_mut().chunks_exact_mut(3) {
        pixel[1] = 0;
        pixel[2] = 0;
    }

    let mut plane = Plane::new(2 * SIZE);
    assert!(read_image(
        WIDTH,
        HEIGHT,
        &integer_format(ColorFamily::Gray, 10),
        None,
        &mut [plane.bytes_mut()],
        None,
        &image,
    )
    .is_ok());
    assert_eq!(plane.samples(2), values);

    // A gray image gives the same samples to every plane
    let image = write_gray::<u8>(8, &values.iter().map(|v| v >> 2).collect::<Vec<_>>());
    let width = image.data().len() as u32;
    let mut planes = [Plane::new(SIZE), Plane::new(SIZE), Plane::new(SIZE)];
    let [red, green, blue] = &mut planes;
    assert!(read_image(
        width,
        1,
        &integer_format(ColorFamily::Rgb, 8),
        None,
        &mut [red.bytes_mut(), green.bytes_mut(), blue.bytes_mut()],
        None,
        &image,
    )
    .is_ok());
    assert_eq!(planes[0].bytes(), planes[1].bytes());
    assert_eq!(planes[0].bytes(), planes[2].bytes());
    assert_eq!(planes[0].bytes(), &image.data()[..]);
}

fn float_ok() {
    const WIDTH: u32 = 4;
    const HEIGHT: u32 = 1;

    let samples = [0.0_f32, 0.25, 0.5, 1.0];
    let plane = Plane::from_floats(&samples);
    let format = float_format(ColorFamily::Rgb);

    let mut hdri = PackedImage::<HdriQ16>::rgba(WIDTH as usize, HEIGHT as usize);
    assert!(write_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &[plane.bytes(), plane.bytes(), plane.bytes()],
        Some(AlphaPlane {
            buffer: plane.bytes(),
            stride: STRIDE_AUTO,
        }),
        &mut hdri,
    )
    .is_ok());
    assert_eq!(hdri.pixel(2, 0)[0].0, 32767.5);
    assert_eq!(hdri.pixel(3, 0)[3].0, 65535.0);

    let mut integer = PackedImage::<u8>::rgb(WIDTH as usize, HEIGHT as usize);
    assert!(write_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &[plane.bytes(), plane.bytes(), plane.bytes()],
        None,
        &mut integer,
    )
    .is_ok());
    assert_eq!(integer.row(0), &[0, 0, 0, 63, 63, 63, 127, 127, 127, 255, 255, 255]);

    let mut red = Plane::new(16);
    let mut green = Plane::new(16);
    let mut blue = Plane::new(16);
    let mut alpha = Plane::from_floats(&[1.0; 4]);
    assert!(read_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &mut [red.bytes_mut(), green.bytes_mut(), blue.bytes_mut()],
        Some(AlphaPlaneMut {
            buffer: alpha.bytes_mut(),
            stride: STRIDE_AUTO,
        }),
        &hdri,
    )
    .is_ok());
    assert_eq!(red.floats(), samples);
    assert_eq!(alpha.floats(), samples);

    // Colors are still read when the image has no alpha
    assert!(read_image(
        WIDTH,
        HEIGHT,
        &format,
        None,
        &mut [red.bytes_mut(), green.bytes_mut(), blue.bytes_mut()],
        Some(AlphaPlaneMut {
            buffer: alpha.bytes_mut(),
            stride: STRIDE_AUTO,
        }),
        &integer,
    )
    .is_ok());
    assert_eq!(blue.floats(), [0.0, 63.0 / 255.0, 127.0 / 255.0, 1.0]);
    assert_eq!(alpha.floats(), [0.0; 4]);
}

#[cfg(all(test, not(feature = "test_instruction_sets")))]
mod conversions {
    use super::{alpha_ok, float_ok, gray_ok, gray_replicate_ok, gray_round_trip_ok};
    use super::{hdri_ok, reuse_ok, rgb_ok};
    use super::{Quantum, STRIDE_AUTO};
    use crate::common::{integer_format, Plane};
    use planar_quantum::{write_image, ColorFamily, PackedImage};
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test as test;

    #[test]
    fn replicate_to_q8() {
        gray_replicate_ok::<u8>();
    }

    #[test]
    fn replicate_to_q16() {
        gray_replicate_ok::<u16>();
    }

    #[test]
    fn replicate_to_q32() {
        gray_replicate_ok::<u32>();
    }

    #[test]
    fn round_trip() {
        gray_round_trip_ok::<u8>(8);
        gray_round_trip_ok::<u16>(16);
        gray_round_trip_ok::<u32>(32);
    }

    #[test]
    fn hdri() {
        hdri_ok();
    }

    #[test]
    fn reused_image() {
        reuse_ok();
    }

    #[test]
    fn known_values() {
        let plane = Plane::from_samples(&[22, 31], 1);
        let mut image = PackedImage::<u8>::gray(2, 1);
        assert!(write_image(
            2,
            1,
            &integer_format(ColorFamily::Gray, 5),
            Some(&[STRIDE_AUTO]),
            &[plane.bytes()],
            None,
            &mut image,
        )
        .is_ok());
        assert_eq!(image.data(), &[181, 255]);

        let plane = Plane::from_samples(&[0xABCD], 2);
        let mut image = PackedImage::<u8>::gray(1, 1);
        assert!(write_image(
            1,
            1,
            &integer_format(ColorFamily::Gray, 16),
            None,
            &[plane.bytes()],
            None,
            &mut image,
        )
        .is_ok());
        assert_eq!(image.data(), &[0xAB]);
        assert_eq!(<u8 as Quantum>::DEPTH, 8);
    }

    #[test]
    fn rgb() {
        rgb_ok();
    }

    #[test]
    fn alpha() {
        alpha_ok();
    }

    #[test]
    fn gray() {
        gray_ok();
    }

    #[test]
    fn float() {
        float_ok();
    }
}

#[cfg(all(test, feature = "test_instruction_sets"))]
mod conversions {
    use super::*;
    use pq::initialize_with_instruction_set;

    #[test]
    fn coverage() {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        const SETS: [&str; 2] = ["x86", "sse2"];
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        const SETS: [&str; 1] = ["x86"];

        for set in &SETS {
            initialize_with_instruction_set(set);

            gray_replicate_ok::<u16>();
            gray_round_trip_ok::<u16>(16);
            hdri_ok();
            reuse_ok();
            rgb_ok();
            alpha_ok();
            gray_ok();
            float_ok();
        }
    }
}
