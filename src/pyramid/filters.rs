use serde::Deserialize;

/// Separable 1D low-pass kernel applied before each 2× decimation.
pub trait SeparableFilter {
    /// Taps in left-to-right order, odd length, centred on the middle tap.
    fn taps(&self) -> &[f32];
}

#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [f32],
}

impl Default for StaticSeparableFilter {
    fn default() -> Self {
        GAUSSIAN_5TAP
    }
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [f32]) -> Self {
        Self { taps }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        self.taps
    }
}

/// `[1, 4, 6, 4, 1] / 16`
pub const GAUSSIAN_5TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.0625, 0.25, 0.375, 0.25, 0.0625]);

/// `[1, 2, 1] / 4`
pub const BINOMIAL_3TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[0.25, 0.5, 0.25]);

/// Named pre-decimation kernels, as selected in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PyramidFilter {
    /// [`GAUSSIAN_5TAP`]
    #[default]
    Gaussian5,
    /// [`BINOMIAL_3TAP`], less smoothing.
    Binomial3,
}

impl PyramidFilter {
    pub fn kernel(self) -> StaticSeparableFilter {
        match self {
            PyramidFilter::Gaussian5 => GAUSSIAN_5TAP,
            PyramidFilter::Binomial3 => BINOMIAL_3TAP,
        }
    }
}
