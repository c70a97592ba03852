use matrix_filter as mf;

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
pub enum KernelType {
    /// Gaussian blur with sigma equal to one third of the kernel radius.
    Gaussian,
    /// Mean of all pixels under the kernel.
    Box,
}

impl From<KernelType> for mf::KernelType {
    fn from(kernel_type: KernelType) -> Self {
        match kernel_type {
            KernelType::Gaussian => mf::KernelType::Gaussian,
            KernelType::Box => mf::KernelType::Box,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Read and write pixels one at a time through get/set methods.
    Accessor,
    /// Address pixels directly in locked buffers.
    Direct,
    /// Same as "direct", but rows are processed in parallel.
    Parallel,
}

impl Strategy {
    /// Part of the name of file with the result of the strategy.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Strategy::Accessor => "accessor",
            Strategy::Direct => "direct",
            Strategy::Parallel => "direct_parallel",
        }
    }
}

impl From<Strategy> for mf::FilterStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Accessor => mf::FilterStrategy::AccessorBased,
            Strategy::Direct => mf::FilterStrategy::DirectBuffer,
            Strategy::Parallel => mf::FilterStrategy::DirectBufferParallel,
        }
    }
}
