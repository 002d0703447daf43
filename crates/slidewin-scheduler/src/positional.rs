//! Positional window driver: `[p - before, p + after]` windows clamped to
//! `[0, n)`, one per output position, optionally stepped and edge-truncated.

use anyhow::{bail, ensure, Result};
use slidewin_core::{interrupt::is_check_point, Interrupt, Monoid, SegmentTree};

/// Validated positional window parameters. `before`/`after` of `None` mean
/// unbounded; `Option<usize>` rules out negative `before`/`after` by
/// construction, eliminating that whole error kind.
#[derive(Clone, Copy, Debug)]
pub struct PositionalParams {
    before: Option<usize>,
    after: Option<usize>,
    step: usize,
    complete: bool,
}

impl PositionalParams {
    /// Construct and validate.
    ///
    /// # Errors
    /// Returns an error if `step == 0`.
    pub fn new(before: Option<usize>, after: Option<usize>, step: usize, complete: bool) -> Result<Self> {
        ensure!(step >= 1, "step must be >= 1, got {step}");
        Ok(Self { before, after, step, complete })
    }
}

/// Run the positional driver over a pre-built tree, writing one result per
/// visited output position and leaving the rest as `NaN`.
///
/// # Errors
/// Returns an error if `interrupt` fires before the loop completes.
pub fn drive_positional<M: Monoid>(
    tree: &SegmentTree<'_, M>,
    params: &PositionalParams,
    interrupt: &impl Interrupt,
) -> Result<Vec<f64>> {
    let n = tree.len();
    let mut out = vec![f64::NAN; n];

    let iter_min = if params.complete {
        params.before.unwrap_or(0).min(n)
    } else {
        0
    };
    let iter_max_raw = if params.complete {
        params.after.map_or(n, |a| n.saturating_sub(a))
    } else {
        n
    };
    let iter_max = iter_max_raw.max(iter_min);

    let mut i = iter_min;
    while i < iter_max {
        if is_check_point(i) && interrupt.is_interrupted() {
            bail!("positional aggregation interrupted at position {i}");
        }

        let window_start = params.before.map_or(0, |b| i.saturating_sub(b));
        let window_stop = params.after.map_or(n, |a| (i + a + 1).min(n));
        out[i] = tree.aggregate_finalized(window_start, window_stop);

        i += params.step;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidewin_core::{Max, Min, NeverInterrupt, Prod, Sum};

    fn build<M: Monoid>(x: &[f64]) -> SegmentTree<'_, M> {
        SegmentTree::<M>::build(x, false)
    }

    #[test]
    fn running_total_before_only() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let tree = build::<Sum>(&x);
        let params = PositionalParams::new(Some(2), Some(0), 1, false).unwrap();
        let out = drive_positional(&tree, &params, &NeverInterrupt).unwrap();
        assert_eq!(out, vec![1.0, 3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn centered_window_complete_truncates_edges() {
        let x = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let tree = build::<Min>(&x);
        let params = PositionalParams::new(Some(2), Some(2), 1, true).unwrap();
        let out = drive_positional(&tree, &params, &NeverInterrupt).unwrap();
        let want: Vec<f64> = vec![f64::NAN, f64::NAN, 1.0, 1.0, 1.0, 1.0, f64::NAN, f64::NAN];
        for (got, want) in out.iter().zip(want.iter()) {
            if want.is_nan() {
                assert!(got.is_nan());
            } else {
                assert_eq!(got, want);
            }
        }
    }

    #[test]
    fn trailing_window_product() {
        let x = [2.0, 3.0, 0.0, 5.0];
        let tree = build::<Prod>(&x);
        let params = PositionalParams::new(Some(0), Some(1), 1, false).unwrap();
        let out = drive_positional(&tree, &params, &NeverInterrupt).unwrap();
        assert_eq!(out, vec![6.0, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn step_only_visits_every_nth_position() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tree = build::<Sum>(&x);
        let params = PositionalParams::new(Some(0), Some(0), 2, false).unwrap();
        let out = drive_positional(&tree, &params, &NeverInterrupt).unwrap();
        assert!(!out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(!out[2].is_nan());
        assert!(out[3].is_nan());
    }

    #[test]
    fn round_trip_unbounded_window_is_full_aggregate() {
        let x = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0];
        let tree = build::<Max>(&x);
        let params = PositionalParams::new(None, None, 1, false).unwrap();
        let out = drive_positional(&tree, &params, &NeverInterrupt).unwrap();
        assert!(out.iter().all(|&v| v == 9.0));
    }

    #[test]
    fn rejects_zero_step() {
        assert!(PositionalParams::new(Some(0), Some(0), 0, false).is_err());
    }
}
