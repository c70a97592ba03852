use thiserror::Error;

use crate::PixelType;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidKernelError {
    #[error("Size of the kernel must be greater than zero")]
    ZeroSize,
    #[error("Side of the kernel must be odd, but it is {0}")]
    EvenSize(u32),
    #[error("Count of weights don't match to square of the kernel side")]
    WeightsCountMismatch,
    #[error("Sum of kernel weights is zero or isn't finite")]
    NotNormalizable,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionMismatchError {
    #[error("Width and height of the image must be greater than zero")]
    ZeroDimensions,
    #[error("Stride is smaller than width of the image in bytes")]
    StrideTooSmall,
    #[error("Size of buffer is smaller than required by image dimensions")]
    InvalidBufferSize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedPixelFormatError {
    #[error("Pixel type {0:?} has less than three color channels")]
    NotEnoughColorChannels(PixelType),
    #[error("Components of pixels must be 8-bit unsigned integers")]
    UnsupportedComponentType,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferAccessError {
    #[error("Locked region is out of the image buffer boundaries")]
    OutOfBounds,
    #[error("Size of the image buffer overflows the address space")]
    AddressOverflow,
    #[error("Failed to allocate buffer for the destination image")]
    AllocationFailed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterError {
    #[error(transparent)]
    InvalidKernel(#[from] InvalidKernelError),
    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatchError),
    #[error(transparent)]
    UnsupportedPixelFormat(#[from] UnsupportedPixelFormatError),
    #[error(transparent)]
    BufferAccess(#[from] BufferAccessError),
}
