//! Width taper policy.
//!
//! Two policies share the `!` symbol:
//!
//! - **Instantaneous**: a bare `!` multiplies the width by the taper factor.
//! - **Gradual**: when a forward-draw runs with no active run, a lookahead
//!   counts the same-scope forward-draws up to the next same-scope `!`. The
//!   width then decays by `taper^(1/n)` per segment so that it reaches exactly
//!   `taper` at the mark, and the mark itself is consumed as a no-op.

use crate::scan::{TaperScan, scan_taper_run};

/// Per-segment decay that reaches `taper` after `segments` multiplications.
///
/// Factors above 1 are clamped to 1: gradual runs never thicken a branch.
pub fn gradual_decay(taper: f32, segments: u32) -> f32 {
    if segments == 0 {
        return 1.0;
    }
    taper.min(1.0).powf(1.0 / segments as f32)
}

/// State of the current gradual-taper run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaperRun {
    /// Multiplier applied to the width before each segment.
    pub decay: f32,
    /// Segments left in the run.
    pub remaining: u32,
    /// Index of the `!` that ends the run.
    pub mark: Option<usize>,
    /// A scan already found no mark before the end of the current scope.
    pub open_scope: bool,
}

impl TaperRun {
    /// No active run.
    pub const INACTIVE: Self = Self {
        decay: 1.0,
        remaining: 0,
        mark: None,
        open_scope: false,
    };

    /// Looks ahead from the forward-draw at `index` and starts a run if a
    /// terminating mark exists in scope.
    pub fn begin(symbols: &[char], index: usize, taper: f32) -> Self {
        match scan_taper_run(symbols, index) {
            TaperScan::Run { segments, mark } => Self {
                decay: gradual_decay(taper, segments),
                remaining: segments,
                mark: Some(mark),
                open_scope: false,
            },
            TaperScan::Open => Self {
                open_scope: true,
                ..Self::INACTIVE
            },
        }
    }

    /// Returns true while segments remain in the run.
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Returns true if the next forward-draw has to look ahead for a mark.
    pub fn needs_scan(&self) -> bool {
        !self.is_active() && !self.open_scope
    }

    /// Consumes one segment and returns the decay to apply to it.
    pub fn advance(&mut self) -> f32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.decay
    }

    /// Returns true if the `!` at `index` terminates this run.
    pub fn terminates_at(&self, index: usize) -> bool {
        self.mark == Some(index)
    }
}

impl Default for TaperRun {
    fn default() -> Self {
        Self::INACTIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradual_decay_compounds_to_taper() {
        for segments in [1u32, 2, 3, 7, 16, 100] {
            let decay = gradual_decay(0.6, segments);
            let total: f32 = (0..segments).map(|_| decay).product();
            assert!(
                (total - 0.6).abs() < 1e-4,
                "segments={segments} total={total}"
            );
        }
    }

    #[test]
    fn test_gradual_decay_clamps_growth() {
        assert_eq!(gradual_decay(1.5, 4), 1.0);
    }

    #[test]
    fn test_begin_run() {
        let s: Vec<char> = "FFF!".chars().collect();
        let run = TaperRun::begin(&s, 0, 0.5);
        assert_eq!(run.remaining, 3);
        assert_eq!(run.mark, Some(3));
        assert!((run.decay.powi(3) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_begin_without_mark_is_inactive() {
        let s: Vec<char> = "FFF".chars().collect();
        let run = TaperRun::begin(&s, 0, 0.5);
        assert!(!run.is_active());
        assert!(!run.needs_scan());
        assert_eq!(run.decay, 1.0);
    }

    #[test]
    fn test_advance_counts_down() {
        let s: Vec<char> = "FF!".chars().collect();
        let mut run = TaperRun::begin(&s, 0, 0.81);
        assert!(run.is_active());
        run.advance();
        run.advance();
        assert!(!run.is_active());
        assert!(run.needs_scan());
        assert!(run.terminates_at(2));
        assert!(!run.terminates_at(1));
    }
}
