/// Complex amplitude with 64-bit components.
///
/// Only the arithmetic the gate kernels need is implemented; everything the
/// simulator exposes to callers is already reduced to real probabilities.
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[inline(always)]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    #[inline(always)]
    pub const fn one() -> Self {
        Self::new(1.0, 0.0)
    }

    #[inline(always)]
    pub const fn i() -> Self {
        Self::new(0.0, 1.0)
    }

    /// |z|²
    #[inline(always)]
    pub fn norm_sq(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// r·e^(iθ)
    #[inline(always)]
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self::new(r * theta.cos(), r * theta.sin())
    }

    #[inline(always)]
    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.re * s, self.im * s)
    }
}

impl Add for Complex {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Neg for Complex {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

/// Approximate equality; amplitudes are compared after floating-point drift.
impl PartialEq for Complex {
    fn eq(&self, other: &Self) -> bool {
        (self.re - other.re).abs() < 1e-10 && (self.im - other.im).abs() < 1e-10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_mul() {
        // (1 + 2i)(3 + 4i) = -5 + 10i
        assert_eq!(Complex::new(1.0, 2.0) * Complex::new(3.0, 4.0), Complex::new(-5.0, 10.0));
    }

    #[test]
    fn test_i_squared() {
        assert_eq!(Complex::i() * Complex::i(), -Complex::one());
    }

    #[test]
    fn test_from_polar_euler() {
        let z = Complex::from_polar(1.0, PI);
        assert_eq!(z, Complex::new(-1.0, 0.0));
    }

    #[test]
    fn test_norm_sq_and_scale() {
        let z = Complex::new(3.0, 4.0).scale(2.0);
        assert!((z.norm_sq() - 100.0).abs() < 1e-10);
        assert_eq!(z - Complex::new(6.0, 8.0) + Complex::one(), Complex::one());
    }
}
