use std::f64::consts::PI;

use crate::InvalidKernelError;

/// Type of kernel generated by [Kernel::build].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum KernelType {
    /// Blur with weights decreasing with distance from the center.
    ///
    /// Only the vertical offset is divided by `2·sigma²`, so the blur
    /// is not the same along horizontal and vertical axes.
    #[default]
    Gaussian,
    /// Each sample of the window contributes with identical weight.
    Box,
}

/// Square matrix of weights convolved against an image.
///
/// Weights are stored row-major: the weight at matrix position `[a, b]`
/// is applied to the sample shifted from the output pixel by
/// `a - radius` columns and `b - radius` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: u32,
    weights: Vec<f64>,
}

impl Kernel {
    /// Create a kernel from weights of `side x side` matrix.
    ///
    /// Weights are used as is, they are not normalized.
    /// The side is checked to be odd and non-zero only when
    /// the kernel is applied to an image.
    pub fn new(side: u32, weights: Vec<f64>) -> Result<Self, InvalidKernelError> {
        if weights.len() != side as usize * side as usize {
            return Err(InvalidKernelError::WeightsCountMismatch);
        }
        Ok(Self { side, weights })
    }

    /// Create a kernel with weights returned by `f(a, b)` for each matrix position.
    pub fn from_fn(side: u32, mut f: impl FnMut(u32, u32) -> f64) -> Self {
        let weights = (0..side)
            .flat_map(|a| (0..side).map(move |b| (a, b)))
            .map(|(a, b)| f(a, b))
            .collect();
        Self { side, weights }
    }

    /// Kernel `1x1` that keeps an image unchanged.
    pub fn identity() -> Self {
        Self {
            side: 1,
            weights: vec![1.0],
        }
    }

    pub fn build(kernel_type: KernelType, size: u32) -> Result<Self, InvalidKernelError> {
        match kernel_type {
            KernelType::Gaussian => Self::gaussian(size),
            KernelType::Box => Self::box_blur(size),
        }
    }

    /// Normalized Gaussian kernel with `sigma = radius / 3`.
    pub fn gaussian(size: u32) -> Result<Self, InvalidKernelError> {
        let radius = radius_of_side(size)?;
        if radius == 0 {
            return Ok(Self::identity());
        }
        let sigma = radius as f64 / 3.;
        let sigma_sqr = sigma * sigma;
        let scale = 1. / (2. * PI * sigma_sqr);
        let radius = radius as i64;
        let mut kernel = Self::from_fn(size, |a, b| {
            let i = (a as i64 - radius) as f64;
            let j = (b as i64 - radius) as f64;
            scale * (-(i * i + j * j / (2. * sigma_sqr))).exp()
        });
        kernel.normalize()?;
        Ok(kernel)
    }

    /// Kernel with all weights equal to `1 / size²`.
    pub fn box_blur(size: u32) -> Result<Self, InvalidKernelError> {
        radius_of_side(size)?;
        let weight = 1. / (size as f64 * size as f64);
        Ok(Self::from_fn(size, |_, _| weight))
    }

    /// Divides every weight by sum of weights.
    pub fn normalize(&mut self) -> Result<(), InvalidKernelError> {
        let sum = self.sum();
        if sum == 0. || !sum.is_finite() {
            return Err(InvalidKernelError::NotNormalizable);
        }
        self.weights.iter_mut().for_each(|w| *w /= sum);
        Ok(())
    }

    #[inline]
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Half-width of sampling window.
    pub fn radius(&self) -> Result<u32, InvalidKernelError> {
        radius_of_side(self.side)
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Get the weight at the given matrix position.
    ///
    /// # Panics
    ///
    /// If `a` or `b` is outside of the kernel.
    #[inline]
    pub fn at(&self, a: u32, b: u32) -> f64 {
        assert!(a < self.side && b < self.side);
        self.weights[(a * self.side + b) as usize]
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

fn radius_of_side(side: u32) -> Result<u32, InvalidKernelError> {
    match side {
        0 => Err(InvalidKernelError::ZeroSize),
        s if s % 2 == 0 => Err(InvalidKernelError::EvenSize(s)),
        s => Ok((s - 1) / 2),
    }
}
