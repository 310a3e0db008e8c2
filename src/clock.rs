/// Playback time source
///
/// Playback does not sample the OS clock itself. The application passes a
/// raw counter value and its frequency to `seconds`, the way performance
/// counters are usually exposed. The first call latches the counter value
/// as time zero. A `reset` unlatches so the next call starts over.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaybackClock {
    epoch: Option<i64>,
}

impl PlaybackClock {
    #[must_use]
    pub const fn new() -> Self {
        Self { epoch: None }
    }

    /// True if a timestamp has been latched since creation or `reset`
    #[must_use]
    pub const fn started(&self) -> bool {
        self.epoch.is_some()
    }

    /// Returns elapsed playback seconds at the given counter value
    ///
    /// `frequency` is in ticks per second and values less than one are
    /// treated as one. A timestamp earlier than the latched epoch counts
    /// as zero elapsed time. `speed` scales the whole elapsed time, so
    /// changing it mid playback also rescales time already played.
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation)]
    pub fn seconds(
        &mut self,
        timestamp: i64,
        frequency: i64,
        speed: f32,
    ) -> f32 {
        let epoch = *self.epoch.get_or_insert(timestamp);
        let ticks = (timestamp - epoch).max(0);
        let elapsed = ticks as f64 / frequency.max(1) as f64;
        (elapsed * f64::from(speed)) as f32
    }

    /// Unlatches the epoch so the next `seconds` call restarts at zero
    pub fn reset(&mut self) {
        self.epoch = None;
    }
}
