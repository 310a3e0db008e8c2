use super::types::Timed;

/// Finds the keyframe interval containing a query time
///
/// For a sequence sorted ascending by time this returns `i` such that
/// `samples[i].time() <= query < samples[i + 1].time()`. The result is
/// clamped to the valid intervals, so a query before the first sample
/// gives 0 and a query at or past the last sample gives `len - 2`.
/// Returns `None` for an empty sequence and `Some(0)` when the sequence
/// is too short to need a search.
///
/// An interpolation estimate picks the starting probe, then a window
/// closing from both ends guarantees convergence no matter how unevenly
/// the times are spaced. Near uniform spacing usually resolves in one or
/// two probes. Out of range and non-finite values are tolerated and give
/// a clamped result instead of a panic.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_sign_loss)]
pub fn find_bracket<T: Timed>(samples: &[T], query: f32) -> Option<usize> {
    if samples.is_empty() {
        return None;
    }
    if samples.len() <= 2 {
        return Some(0);
    }
    let last = samples.len() - 1;
    let first_time = samples[0].time();
    let last_time = samples[last].time();

    // Not `f32::clamp` since a malformed sequence could reverse the limits
    let query = query.max(first_time).min(last_time);
    if query >= last_time {
        return Some(last - 1);
    }

    // Window such that samples[lo].time() <= query < samples[hi].time()
    let mut lo = 0;
    let mut hi = last;

    // Estimate a starting probe as if the samples were evenly spaced
    let span = last_time - first_time;
    let mut probe = ((query - first_time) / span * last as f32) as usize;

    while hi - lo > 1 {
        let mid = probe.clamp(lo + 1, hi - 1);
        if samples[mid].time() <= query {
            lo = mid;
        } else {
            hi = mid;
        }
        // Fall back to bisection once the estimate has been used
        probe = (lo + hi) / 2;
    }
    Some(lo)
}
