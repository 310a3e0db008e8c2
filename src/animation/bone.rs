use super::{
    search,
    types::{Animation, Skeleton, Timed},
    util,
};
use crate::{
    clock::PlaybackClock,
    pv_error::PvError,
    transform::{self, Srt},
    types::{Animator, RepeatMode, SceneTrait},
};
use itertools::Itertools;
use log::{debug, trace};
use nalgebra_glm as glm;
use std::sync::Arc;

/// One contiguous run of keyframes sharing a time value
#[derive(Clone, Copy, Debug)]
struct TimeRange {
    time: f32,
    first: usize,
    len: usize,
}

impl Timed for TimeRange {
    fn time(&self) -> f32 {
        self.time
    }
}

/// Plays the shared bone timeline of an animation
///
/// Produces one skin space matrix per bone each update, ready for a
/// skinning shader. The keyframe sequence is cut into time ranges when the
/// animator is built, so every bone keyed at one time advances through the
/// same range cursor and no per bone search happens during playback.
///
/// Bones without a keyframe in the current range keep their most recently
/// staged pose, starting from the bind pose, so sparsely keyed skeletons
/// play back correctly.
pub struct BoneAnimator {
    animation: Arc<Animation>,
    skeleton: Arc<Skeleton>,
    ranges: Vec<TimeRange>,
    range_index: usize,
    clock: PlaybackClock,
    speed: f32,
    repeat: RepeatMode,
    stopped: bool,
    staged: Vec<Srt>,
    composed: Vec<glm::Mat4>,
    skin: Vec<glm::Mat4>,
}

impl BoneAnimator {
    /// Creates an animator for the bone keyframes of an animation
    ///
    /// All scratch and output buffers are sized here so playback does not
    /// allocate.
    ///
    /// # Errors
    /// May return `PvError` if the animation has no bone keyframes, the
    /// keyframe times are not sorted ascending, a keyframe names a bone
    /// outside the skeleton, or the skeleton fails validation
    pub fn new(
        animation: Arc<Animation>,
        skeleton: Arc<Skeleton>,
    ) -> Result<Self, PvError> {
        skeleton.validate()?;
        let keys = &animation.bone_keyframes;
        if keys.is_empty() {
            return Err(PvError::NoKeyframes);
        }
        if let Some(i) = util::first_unsorted(keys) {
            return Err(PvError::UnsortedTimes(i));
        }
        if let Some(i) =
            keys.iter().position(|k| k.bone >= skeleton.bones.len())
        {
            return Err(PvError::BoneIndexRange(i));
        }

        // Cut the sorted sequence into ranges of identical time
        let mut ranges = Vec::new();
        let mut first = 0;
        for (time, group) in &keys.iter().group_by(|key| key.time) {
            let len = group.count();
            ranges.push(TimeRange { time, first, len });
            first += len;
        }
        debug!(
            "animation={} bones={} ranges={}",
            animation.name,
            skeleton.bones.len(),
            ranges.len()
        );

        let staged =
            skeleton.bones.iter().map(|b| Srt::from(&b.bind)).collect();
        let bone_count = skeleton.bones.len();
        Ok(Self {
            animation,
            skeleton,
            ranges,
            range_index: 0,
            clock: PlaybackClock::new(),
            speed: 1.0,
            repeat: RepeatMode::default(),
            stopped: false,
            staged,
            composed: vec![glm::Mat4::identity(); bone_count],
            skin: vec![glm::Mat4::identity(); bone_count],
        })
    }

    /// Skin space bone matrices from the most recent update
    #[must_use]
    pub fn skin_matrices(&self) -> &[glm::Mat4] {
        &self.skin
    }

    /// Copies the skin space bone matrices into a caller owned buffer,
    /// reusing its allocation when it has the capacity
    pub fn copy_skin_into(&self, buffer: &mut Vec<glm::Mat4>) {
        buffer.clear();
        buffer.extend_from_slice(&self.skin);
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.skeleton.bones.len()
    }

    /// True once a `PlayOnce` animation has passed its end time
    #[must_use]
    pub const fn stopped(&self) -> bool {
        self.stopped
    }

    /// Stages the local pose of every bone keyed in the current range,
    /// blending toward the next range when the time is inside the interval
    fn stage(&mut self, elapsed: f32) {
        let range = self.ranges[self.range_index];
        for key in &self.animation.bone_keyframes
            [range.first..range.first + range.len]
        {
            self.staged[key.bone] = Srt::from(key);
        }
        if self.range_index + 1 < self.ranges.len() && elapsed > range.time {
            let next = self.ranges[self.range_index + 1];
            let amount = util::weight(range.time, next.time, elapsed);
            for key in &self.animation.bone_keyframes
                [next.first..next.first + next.len]
            {
                self.staged[key.bone] = transform::blend(
                    &self.staged[key.bone],
                    &Srt::from(key),
                    amount,
                );
            }
        }
    }

    /// Composes the staged poses down the hierarchy and converts each bone
    /// to skin space
    fn compose(&mut self) {
        for i in 0..self.skeleton.bones.len() {
            let bone = &self.skeleton.bones[i];
            let local = self.staged[i].to_mat4();
            let composed =
                bone.parent.map_or(local, |p| self.composed[p] * local);
            self.composed[i] = composed;
            self.skin[i] = composed * bone.inverse_bind;
        }
    }
}

impl Animator for BoneAnimator {
    fn update(
        &mut self,
        timestamp: i64,
        frequency: i64,
        _scene: &mut dyn SceneTrait,
    ) {
        if self.stopped {
            return;
        }
        let mut elapsed = self.clock.seconds(timestamp, frequency, self.speed);
        if elapsed > self.animation.end_time {
            match self.repeat {
                RepeatMode::PlayOnce => {
                    // Leave the last computed pose in place
                    trace!("animation={} finished", self.animation.name);
                    self.stopped = true;
                    return;
                }
                RepeatMode::PlayOnceHold => {
                    elapsed = self.animation.end_time;
                }
                RepeatMode::Loop => {
                    self.range_index = 0;
                    self.clock.reset();
                    elapsed =
                        self.clock.seconds(timestamp, frequency, self.speed);
                }
            }
        }

        // Time normally only moves forward so the cursor just advances. A
        // backward jump falls back to a search.
        if self.ranges[self.range_index].time > elapsed {
            self.range_index =
                search::find_bracket(&self.ranges, elapsed).unwrap_or(0);
        }
        while self.range_index + 1 < self.ranges.len()
            && self.ranges[self.range_index + 1].time <= elapsed
        {
            self.range_index += 1;
        }

        self.stage(elapsed);
        self.compose();
    }

    fn reset(&mut self) {
        self.range_index = 0;
        self.clock.reset();
        self.stopped = false;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }
}
