#![allow(dead_code)]

use planar_quantum as pq;
use pq::{ColorFamily, FrameFormat, SampleType};

/// Plane storage aligned for any sample size.
pub struct Plane {
    words: Vec<u32>,
    len: usize,
}

impl Plane {
    pub fn new(len: usize) -> Self {
        Plane {
            words: vec![0; (len + 3) / 4],
            len,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn from_samples(values: &[u64], sample_size: usize) -> Self {
        let mut plane = Plane::new(values.len() * sample_size);
        for (chunk, &value) in plane
            .bytes_mut()
            .chunks_exact_mut(sample_size)
            .zip(values)
        {
            match sample_size {
                1 => chunk[0] = value as u8,
                2 => chunk.copy_from_slice(&(value as u16).to_ne_bytes()),
                _ => chunk.copy_from_slice(&(value as u32).to_ne_bytes()),
            }
        }

        plane
    }

    pub fn from_floats(values: &[f32]) -> Self {
        let mut plane = Plane::new(4 * values.len());
        for (chunk, value) in plane.bytes_mut().chunks_exact_mut(4).zip(values) {
            chunk.copy_from_slice(&value.to_ne_bytes());
        }

        plane
    }

    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u32, u8>(&self.words)[..self.len]
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len;
        &mut bytemuck::cast_slice_mut::<u32, u8>(&mut self.words)[..len]
    }

    pub fn samples(&self, sample_size: usize) -> Vec<u64> {
        self.bytes()
            .chunks_exact(sample_size)
            .map(|chunk| match sample_size {
                1 => u64::from(chunk[0]),
                2 => u64::from(u16::from_ne_bytes([chunk[0], chunk[1]])),
                _ => u64::from(u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])),
            })
            .collect()
    }

    pub fn floats(&self) -> Vec<f32> {
        self.bytes()
            .chunks_exact(4)
            .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }
}

pub fn integer_format(color_family: ColorFamily, bits_per_sample: u32) -> FrameFormat {
    FrameFormat {
        color_family,
        sample_type: SampleType::Integer,
        bits_per_sample,
    }
}

pub fn float_format(color_family: ColorFamily) -> FrameFormat {
    FrameFormat {
        color_family,
        sample_type: SampleType::Float,
        bits_per_sample: 32,
    }
}

/// Repeats the bits of `value` until `depth` bits are filled, or keeps its top
/// `depth` bits when it is wider.
#[allow(clippy::cast_possible_truncation)]
pub fn replicate(value: u64, bits: u32, depth: u32) -> u64 {
    let mut acc = u128::from(value);
    let mut len = bits;
    while len < depth {
        acc = (acc << bits) | u128::from(value);
        len += bits;
    }

    (acc >> (len - depth)) as u64
}
