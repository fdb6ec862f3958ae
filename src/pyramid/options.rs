use super::filters::{SeparableFilter, StaticSeparableFilter, GAUSSIAN_5TAP};

/// Options controlling pyramid construction.
#[derive(Clone, Copy)]
pub struct PyramidOptions {
    /// Requested number of levels (>= 1), including the full-resolution one.
    pub levels: usize,
    /// Number of initial downscale steps that low-pass filter before
    /// decimating. `None` filters on every step, `Some(0)` never does.
    pub blur_levels: Option<usize>,
    pub filter: StaticSeparableFilter,
}

impl PyramidOptions {
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            blur_levels: None,
            filter: GAUSSIAN_5TAP,
        }
    }

    pub fn with_blur_levels(mut self, blur_levels: Option<usize>) -> Self {
        self.blur_levels = blur_levels;
        self
    }

    pub fn with_filter(mut self, filter: StaticSeparableFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Whether downscale step `step` (1-based) filters before decimating.
    pub(crate) fn blurs_step(&self, step: usize) -> bool {
        self.blur_levels.map_or(true, |limit| step <= limit)
    }
}

impl std::fmt::Debug for PyramidOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyramidOptions")
            .field("levels", &self.levels)
            .field("blur_levels", &self.blur_levels)
            .field("filter_taps", &self.filter.taps().len())
            .finish()
    }
}
