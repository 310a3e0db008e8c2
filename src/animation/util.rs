use super::types::Timed;

/// Helper to calculate the parameter used for interpolation
///
/// Clamped to the 0 to 1 range. A zero length or reversed interval gives
/// 0 rather than dividing by zero, so a degenerate pair of keyframes at
/// the same time resolves to the earlier pose.
pub(crate) fn weight(start: f32, end: f32, current: f32) -> f32 {
    const EPSILON: f32 = 0.0005;
    ((current - start) / (end - start).max(EPSILON)).clamp(0.0f32, 1.0f32)
}

/// Returns the index of the first sample that is earlier than its
/// predecessor, or `None` if the sequence is sorted
pub(crate) fn first_unsorted<T: Timed>(samples: &[T]) -> Option<usize> {
    (1..samples.len()).find(|&i| samples[i].time() < samples[i - 1].time())
}
