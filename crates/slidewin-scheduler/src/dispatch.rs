//! Public entry points: bind a monoid to a driver, build the tree once, and
//! run the loop. One generic function per driver shape, monomorphized per
//! monoid at the call site rather than dispatched through a vtable.

use anyhow::Result;
use slidewin_core::{Interrupt, Max, Mean, Min, Monoid, NeverInterrupt, Prod, SegmentTree, Sum};

use crate::index::{drive_index, IndexParams};
use crate::positional::{drive_positional, PositionalParams};

/// `summary_slide`, with an explicit cancellation source.
///
/// # Errors
/// Propagates validation failures from [`PositionalParams::new`] and
/// interruption from the driver loop.
pub fn summary_slide_with_interrupt<M: Monoid>(
    x: &[f64],
    before: Option<usize>,
    after: Option<usize>,
    step: usize,
    complete: bool,
    na_rm: bool,
    interrupt: &impl Interrupt,
) -> Result<Vec<f64>> {
    let params = PositionalParams::new(before, after, step, complete)?;
    let tree = SegmentTree::<M>::build(x, na_rm);
    drive_positional(&tree, &params, interrupt)
}

/// Positional summary slide: `before`/`after` of `None` mean unbounded.
///
/// # Errors
/// Returns an error if `step == 0`.
pub fn summary_slide<M: Monoid>(
    x: &[f64],
    before: Option<usize>,
    after: Option<usize>,
    step: usize,
    complete: bool,
    na_rm: bool,
) -> Result<Vec<f64>> {
    summary_slide_with_interrupt::<M>(x, before, after, step, complete, na_rm, &NeverInterrupt)
}

/// `summary_slide_index`, with an explicit cancellation source.
///
/// # Errors
/// Propagates validation failures from [`IndexParams::new`] and
/// interruption from the driver loop.
pub fn summary_slide_index_with_interrupt<M: Monoid, K: Ord + Copy>(
    x: &[f64],
    i: &[K],
    starts: &[K],
    stops: &[K],
    peer_sizes: &[usize],
    complete: bool,
    na_rm: bool,
    interrupt: &impl Interrupt,
) -> Result<Vec<f64>> {
    let params = IndexParams::new(x.len(), i, starts, stops, peer_sizes, complete)?;
    let tree = SegmentTree::<M>::build(x, na_rm);
    drive_index(&tree, &params, interrupt)
}

/// Index-anchored summary slide; output length always equals `x.len()`,
/// fanning each peer group's result out across its member positions rather
/// than returning one entry per `m`-length peer group.
///
/// # Errors
/// Returns an error on mismatched lengths or a malformed `peer_sizes` run
/// structure.
pub fn summary_slide_index<M: Monoid, K: Ord + Copy>(
    x: &[f64],
    i: &[K],
    starts: &[K],
    stops: &[K],
    peer_sizes: &[usize],
    complete: bool,
    na_rm: bool,
) -> Result<Vec<f64>> {
    summary_slide_index_with_interrupt::<M, K>(x, i, starts, stops, peer_sizes, complete, na_rm, &NeverInterrupt)
}

/// A monoid selected at runtime (the CLI's string `--stat` argument maps to
/// one of these before the call monomorphizes into the hot loop).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonoidKind {
    /// `sum`
    Sum,
    /// `prod`
    Prod,
    /// `mean`
    Mean,
    /// `min`
    Min,
    /// `max`
    Max,
}

impl MonoidKind {
    /// Dispatch `summary_slide` for the selected monoid.
    ///
    /// # Errors
    /// See [`summary_slide`].
    pub fn slide(
        self,
        x: &[f64],
        before: Option<usize>,
        after: Option<usize>,
        step: usize,
        complete: bool,
        na_rm: bool,
    ) -> Result<Vec<f64>> {
        match self {
            Self::Sum => summary_slide::<Sum>(x, before, after, step, complete, na_rm),
            Self::Prod => summary_slide::<Prod>(x, before, after, step, complete, na_rm),
            Self::Mean => summary_slide::<Mean>(x, before, after, step, complete, na_rm),
            Self::Min => summary_slide::<Min>(x, before, after, step, complete, na_rm),
            Self::Max => summary_slide::<Max>(x, before, after, step, complete, na_rm),
        }
    }

    /// As [`Self::slide`], but polling `interrupt` for cooperative
    /// cancellation (what the CLI wires Ctrl-C into).
    ///
    /// # Errors
    /// See [`summary_slide_with_interrupt`].
    pub fn slide_with_interrupt(
        self,
        x: &[f64],
        before: Option<usize>,
        after: Option<usize>,
        step: usize,
        complete: bool,
        na_rm: bool,
        interrupt: &impl Interrupt,
    ) -> Result<Vec<f64>> {
        match self {
            Self::Sum => summary_slide_with_interrupt::<Sum>(x, before, after, step, complete, na_rm, interrupt),
            Self::Prod => summary_slide_with_interrupt::<Prod>(x, before, after, step, complete, na_rm, interrupt),
            Self::Mean => summary_slide_with_interrupt::<Mean>(x, before, after, step, complete, na_rm, interrupt),
            Self::Min => summary_slide_with_interrupt::<Min>(x, before, after, step, complete, na_rm, interrupt),
            Self::Max => summary_slide_with_interrupt::<Max>(x, before, after, step, complete, na_rm, interrupt),
        }
    }

    /// Dispatch `summary_slide_index` for the selected monoid.
    ///
    /// # Errors
    /// See [`summary_slide_index`].
    pub fn slide_index<K: Ord + Copy>(
        self,
        x: &[f64],
        i: &[K],
        starts: &[K],
        stops: &[K],
        peer_sizes: &[usize],
        complete: bool,
        na_rm: bool,
    ) -> Result<Vec<f64>> {
        match self {
            Self::Sum => summary_slide_index::<Sum, K>(x, i, starts, stops, peer_sizes, complete, na_rm),
            Self::Prod => summary_slide_index::<Prod, K>(x, i, starts, stops, peer_sizes, complete, na_rm),
            Self::Mean => summary_slide_index::<Mean, K>(x, i, starts, stops, peer_sizes, complete, na_rm),
            Self::Min => summary_slide_index::<Min, K>(x, i, starts, stops, peer_sizes, complete, na_rm),
            Self::Max => summary_slide_index::<Max, K>(x, i, starts, stops, peer_sizes, complete, na_rm),
        }
    }

    /// As [`Self::slide_index`], but polling `interrupt` for cooperative
    /// cancellation.
    ///
    /// # Errors
    /// See [`summary_slide_index_with_interrupt`].
    pub fn slide_index_with_interrupt<K: Ord + Copy>(
        self,
        x: &[f64],
        i: &[K],
        starts: &[K],
        stops: &[K],
        peer_sizes: &[usize],
        complete: bool,
        na_rm: bool,
        interrupt: &impl Interrupt,
    ) -> Result<Vec<f64>> {
        match self {
            Self::Sum => summary_slide_index_with_interrupt::<Sum, K>(x, i, starts, stops, peer_sizes, complete, na_rm, interrupt),
            Self::Prod => summary_slide_index_with_interrupt::<Prod, K>(x, i, starts, stops, peer_sizes, complete, na_rm, interrupt),
            Self::Mean => summary_slide_index_with_interrupt::<Mean, K>(x, i, starts, stops, peer_sizes, complete, na_rm, interrupt),
            Self::Min => summary_slide_index_with_interrupt::<Min, K>(x, i, starts, stops, peer_sizes, complete, na_rm, interrupt),
            Self::Max => summary_slide_index_with_interrupt::<Max, K>(x, i, starts, stops, peer_sizes, complete, na_rm, interrupt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_na_rm_positional() {
        let x = [1.0, 2.0, f64::NAN, 4.0];
        let out = summary_slide::<Mean>(&x, Some(1), Some(1), 1, false, true).unwrap();
        assert_eq!(out, vec![1.5, 1.5, 3.0, 4.0]);
    }

    #[test]
    fn monoid_kind_dispatches_by_name() {
        let x = [1.0, 2.0, 3.0];
        let via_kind = MonoidKind::Sum.slide(&x, None, None, 1, false, false).unwrap();
        let via_generic = summary_slide::<Sum>(&x, None, None, 1, false, false).unwrap();
        assert_eq!(via_kind, via_generic);
    }

    #[test]
    fn step_zero_is_rejected_before_tree_build() {
        let x = [1.0, 2.0, 3.0];
        assert!(summary_slide::<Sum>(&x, Some(0), Some(0), 0, false, false).is_err());
    }
}
