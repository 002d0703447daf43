//! Index-anchored window driver: resolves one window per output peer group
//! from `starts`/`stops` against a monotone index `i`, then fans the
//! group's aggregate out to every input position sharing that group.

use anyhow::{bail, ensure, Result};
use slidewin_core::{interrupt::is_check_point, Interrupt, Monoid, SegmentTree};

use crate::peer::{build_peer_info, locate_peer_starts_pos, locate_peer_stops_pos, PeerInfo};

/// Validated index-driver parameters for a single call.
pub struct IndexParams<'a, K> {
    i: &'a [K],
    starts: &'a [K],
    stops: &'a [K],
    peer: PeerInfo,
    complete: bool,
}

impl<'a, K: Ord> IndexParams<'a, K> {
    /// Validate lengths and derive peer-group bookkeeping from `peer_sizes`.
    ///
    /// # Errors
    /// Returns an error if `i.len() != n`, `starts.len() != stops.len()`, or
    /// `peer_sizes` fails to reconstruct a valid run structure over `n`.
    pub fn new(n: usize, i: &'a [K], starts: &'a [K], stops: &'a [K], peer_sizes: &[usize], complete: bool) -> Result<Self> {
        ensure!(i.len() == n, "index length {} must equal input length {n}", i.len());
        ensure!(
            starts.len() == stops.len(),
            "starts length {} must equal stops length {}",
            starts.len(),
            stops.len()
        );
        ensure!(peer_sizes.len() == n, "peer_sizes length {} must equal input length {n}", peer_sizes.len());
        let peer = build_peer_info(peer_sizes)?;
        Ok(Self { i, starts, stops, peer, complete })
    }
}

/// Run the index driver over a pre-built tree, fanning each output peer
/// group's aggregate across every input position in that group. Positions
/// belonging to a skipped (edge-truncated, under `complete = true`) group
/// stay `NaN`.
///
/// # Errors
/// Returns an error if `interrupt` fires before the loop completes.
pub fn drive_index<M: Monoid, K: Ord + Copy>(
    tree: &SegmentTree<'_, M>,
    params: &IndexParams<'_, K>,
    interrupt: &impl Interrupt,
) -> Result<Vec<f64>> {
    let n = tree.len();
    let mut out = vec![f64::NAN; n];
    let m = params.peer.group_count();

    let (iter_min, iter_max) = iteration_bounds(params, m);

    let mut k = iter_min;
    while k < iter_max {
        if is_check_point(k) && interrupt.is_interrupted() {
            bail!("index aggregation interrupted at group {k}");
        }

        let starts_pos = locate_peer_starts_pos(params.i, &params.starts[k]);
        let stops_pos = locate_peer_stops_pos(params.i, &params.stops[k]);

        let result = match stops_pos {
            Some(sp) if (sp as isize) >= starts_pos as isize => {
                let window_start = params.peer.peer_starts[starts_pos];
                let window_stop = params.peer.peer_stops[sp] + 1;
                tree.aggregate_finalized(window_start, window_stop)
            }
            _ => tree.aggregate_finalized(0, 0),
        };

        let first = params.peer.group_first_pos[k];
        let size = params.peer.group_sizes[k];
        out[first..first + size].fill(result);

        k += 1;
    }

    Ok(out)
}

/// `complete = false` visits every group; `complete = true` skips leading
/// groups whose `starts` falls before `i`'s first value and trailing groups
/// whose `stops` falls past `i`'s last value, mirroring the positional
/// driver's edge truncation.
fn iteration_bounds<K: Ord + Copy>(params: &IndexParams<'_, K>, m: usize) -> (usize, usize) {
    if !params.complete || params.i.is_empty() || m == 0 {
        return (0, m);
    }
    let first = params.i[0];
    let last = *params.i.last().expect("checked non-empty above");

    let iter_min = params.starts.partition_point(|s| *s < first);
    let iter_max = params.stops.partition_point(|s| *s <= last);

    (iter_min.min(m), iter_max.max(iter_min).min(m))
}
