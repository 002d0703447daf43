//! Peer-group bookkeeping for the index-anchored driver.
//!
//! A peer group is a maximal run of input positions that share the same
//! output; `peer_sizes` encodes the run lengths at each run's first
//! position (entries at non-first positions are ignored, per contract).

use anyhow::{ensure, Result};

/// Per-input-position peer-group bounds, plus the run structure needed to
/// fan a per-group aggregate back out to every member's output slot.
pub struct PeerInfo {
    /// `peer_starts[k]`: first input position of the run containing `k`.
    pub peer_starts: Vec<usize>,
    /// `peer_stops[k]`: last input position of the run containing `k`.
    pub peer_stops: Vec<usize>,
    /// First input position of output peer group `g`, in order.
    pub group_first_pos: Vec<usize>,
    /// Size of output peer group `g`, parallel to `group_first_pos`.
    pub group_sizes: Vec<usize>,
}

impl PeerInfo {
    /// Number of output peer groups (runs).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_first_pos.len()
    }
}

/// Walk `peer_sizes` in order, reconstructing run boundaries. Only the
/// entry at each run's first position is read; later entries in the same
/// run are never touched.
///
/// # Errors
/// Returns an error if a run size is zero or the runs overrun `peer_sizes`'
/// own length (equivalent to `sum(peer_sizes-at-run-starts) != n`).
pub fn build_peer_info(peer_sizes: &[usize]) -> Result<PeerInfo> {
    let n = peer_sizes.len();
    let mut peer_starts = vec![0usize; n];
    let mut peer_stops = vec![0usize; n];
    let mut group_first_pos = Vec::new();
    let mut group_sizes = Vec::new();

    let mut pos = 0usize;
    while pos < n {
        let size = peer_sizes[pos];
        ensure!(size >= 1, "peer group at position {pos} has size {size}, must be >= 1");
        let end = pos
            .checked_add(size)
            .filter(|&e| e <= n)
            .ok_or_else(|| anyhow::anyhow!("peer group at position {pos} overruns input length {n}"))?;

        for slot in peer_starts.iter_mut().take(end).skip(pos) {
            *slot = pos;
        }
        for slot in peer_stops.iter_mut().take(end).skip(pos) {
            *slot = end - 1;
        }
        group_first_pos.push(pos);
        group_sizes.push(size);
        pos = end;
    }

    Ok(PeerInfo {
        peer_starts,
        peer_stops,
        group_first_pos,
        group_sizes,
    })
}

/// Smallest input position `p` with `i[p] >= target`, or `i.len()` if none.
///
/// Binary search over `i`; valid because `i[peer_starts[p]] == i[p]` (a run
/// shares one index value), so searching `i` directly instead of the
/// peer-expanded view is equivalent and avoids an indirection.
#[must_use]
pub fn locate_peer_starts_pos<K: Ord>(i: &[K], target: &K) -> usize {
    i.partition_point(|v| v < target)
}

/// Largest input position `p` with `i[p] <= target`, or `None` if every
/// entry in `i` is greater than `target`.
#[must_use]
pub fn locate_peer_stops_pos<K: Ord>(i: &[K], target: &K) -> Option<usize> {
    let p = i.partition_point(|v| v <= target);
    p.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_run_covers_everything() {
        let info = build_peer_info(&[3, 0, 0]).unwrap();
        assert_eq!(info.group_first_pos, vec![0]);
        assert_eq!(info.group_sizes, vec![3]);
        assert_eq!(info.peer_starts, vec![0, 0, 0]);
        assert_eq!(info.peer_stops, vec![2, 2, 2]);
    }

    #[test]
    fn mixed_run_sizes() {
        // groups: [0,1] size 2, [2] size 1, [3] size 1
        let info = build_peer_info(&[2, 0, 1, 1]).unwrap();
        assert_eq!(info.group_first_pos, vec![0, 2, 3]);
        assert_eq!(info.group_sizes, vec![2, 1, 1]);
        assert_eq!(info.peer_starts, vec![0, 0, 2, 3]);
        assert_eq!(info.peer_stops, vec![1, 1, 2, 3]);
    }

    #[test]
    fn zero_size_run_rejected() {
        assert!(build_peer_info(&[0, 1]).is_err());
    }

    #[test]
    fn overrunning_run_rejected() {
        assert!(build_peer_info(&[5]).is_err());
    }

    #[test]
    fn locate_resolves_mixed_run_boundaries() {
        let i = [1, 1, 2, 3];
        assert_eq!(locate_peer_starts_pos(&i, &1), 0);
        assert_eq!(locate_peer_stops_pos(&i, &2), Some(2));
        assert_eq!(locate_peer_starts_pos(&i, &3), 3);
        assert_eq!(locate_peer_stops_pos(&i, &3), Some(3));
    }

    #[test]
    fn locate_out_of_bounds_on_both_sides() {
        let i = [10, 20, 30];
        assert_eq!(locate_peer_starts_pos(&i, &100), 3);
        assert_eq!(locate_peer_stops_pos(&i, &200), Some(2));
        assert_eq!(locate_peer_stops_pos(&i, &5), None);
    }
}
