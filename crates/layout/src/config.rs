//! Breaking configuration.

/// How the adjusted content is distributed across a span's measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakerConfig {
    /// Target measure for every span of the scope (line length, page
    /// height).
    pub target: f32,
    /// Maximum acceptable stretch ratio for a span. Spans needing more
    /// stretch than `tolerance` times the available stretch are rejected
    /// while feasible alternatives exist.
    ///
    /// Defaults to `1.0`.
    pub tolerance: f32,
    pub alignment: Alignment,
    /// Extra demerits charged when two consecutive chosen breaks are both
    /// flagged (width-carrying) penalties.
    ///
    /// Defaults to `100.0`.
    pub flagged_demerit: f32,
    /// How many tolerance-doubling steps to try when a forced break is
    /// reached with no feasible candidate, before settling on the
    /// least-bad chain with a diagnostic.
    ///
    /// Defaults to `4`.
    pub relax_steps: u32,
}

impl BreakerConfig {
    pub fn for_target(target: f32) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            target: 0.0,
            tolerance: 1.0,
            alignment: Alignment::Start,
            flagged_demerit: 100.0,
            relax_steps: 4,
        }
    }
}
