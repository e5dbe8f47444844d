//! Pure lookahead scans over an expanded string.
//!
//! Both scans respect bracket scope: a nested `[...]` is skipped as a whole,
//! and an unmatched `]` ends the scope being scanned.

use crate::symbol::is_forward;

/// Outcome of looking ahead for a gradual-taper run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaperScan {
    /// A same-depth `!` was found after `segments` same-depth forward-draws.
    Run {
        /// Forward-draws between the scan start (inclusive) and the mark.
        segments: u32,
        /// Index of the terminating `!`.
        mark: usize,
    },
    /// The scope ended without a same-depth `!`.
    Open,
}

/// Scans from `start` (normally the index of the forward-draw about to run)
/// to the end of the current bracket scope.
///
/// Only symbols at the starting depth count: forward-draws and `!` inside
/// nested branches are ignored. A mark preceded by zero forward-draws is
/// reported as [`TaperScan::Open`].
pub fn scan_taper_run(symbols: &[char], start: usize) -> TaperScan {
    let mut depth = 0usize;
    let mut segments = 0u32;

    for (index, &c) in symbols.iter().enumerate().skip(start) {
        match c {
            '[' => depth += 1,
            ']' if depth == 0 => break,
            ']' => depth -= 1,
            '!' if depth == 0 => {
                return if segments > 0 {
                    TaperScan::Run {
                        segments,
                        mark: index,
                    }
                } else {
                    TaperScan::Open
                };
            }
            c if depth == 0 && is_forward(c) => segments += 1,
            _ => {}
        }
    }

    TaperScan::Open
}

/// Returns true if growth follows position `start` within the same branch:
/// a forward-draw or a branch-open appears before a `]` or the string end.
///
/// Every other symbol (rotations, taper marks, leaves, unknown symbols) is
/// passed over.
pub fn has_growth_ahead(symbols: &[char], start: usize) -> bool {
    for &c in symbols.iter().skip(start) {
        match c {
            ']' => return false,
            '[' => return true,
            c if is_forward(c) => return true,
            _ => {}
        }
    }
    false
}
