//! Spectral engine
//!
//! Iterative in-place radix-2 Cooley-Tukey FFT. No normalisation is applied;
//! callers only compare bin magnitudes against each other.
//!
//! Twiddle factors are recomputed per stage on every call rather than kept in
//! a table, trading a few `sinf`/`cosf` calls for RAM.

use core::f32::consts::PI;
use core::ops::{Add, Mul, Sub};

/// Complex value used inside the FFT
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    /// Real value with zero imaginary part
    pub const fn from_real(re: f32) -> Self {
        Self { re, im: 0.0 }
    }

    /// Unit phasor `exp(i·angle)`
    pub fn from_angle(angle: f32) -> Self {
        Self {
            re: libm::cosf(angle),
            im: libm::sinf(angle),
        }
    }

    /// Modulus `sqrt(re² + im²)`
    pub fn norm(&self) -> f32 {
        libm::sqrtf(self.re * self.re + self.im * self.im)
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Reverse the low `bits` bits of `n`
pub fn reverse_bits(n: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    n.reverse_bits() >> (usize::BITS - bits)
}

/// Number of address bits for a transform of length `n` (`ceil(log2(n))`)
fn index_bits(n: usize) -> u32 {
    n.next_power_of_two().trailing_zeros()
}

/// Reorder `data` into bit-reversed index order
pub fn bit_reverse_permute(data: &mut [Complex]) {
    let bits = index_bits(data.len());
    for i in 0..data.len() {
        let j = reverse_bits(i, bits);
        if j > i {
            data.swap(i, j);
        }
    }
}

/// Transform `data` in place into its discrete Fourier transform
///
/// # Panics
///
/// Panics if the length is not a power of two. Passing such a buffer is a
/// programming error.
pub fn fft(data: &mut [Complex]) {
    let n = data.len();
    assert!(
        n.is_power_of_two(),
        "FFT length must be a power of two, got {}",
        n
    );

    bit_reverse_permute(data);

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let step = Complex::from_angle(-2.0 * PI / size as f32);

        for block in data.chunks_exact_mut(size) {
            let (lower, upper) = block.split_at_mut(half);
            let mut w = Complex::ONE;

            for (u, v) in lower.iter_mut().zip(upper.iter_mut()) {
                let t = w * *v;
                *v = *u - t;
                *u = *u + t;
                w = w * step;
            }
        }

        size *= 2;
    }
}
