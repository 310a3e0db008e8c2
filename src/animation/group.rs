use crate::types::{Animator, RepeatMode, SceneTrait};

/// One playback control surface over a set of animators
///
/// An asset often needs several animator kinds playing together. The
/// group fans `update` and `reset` out to every child in insertion order
/// and pushes speed and repeat changes down with plain method calls, so
/// the whole set stays in lockstep. Groups implement `Animator` and can
/// nest.
pub struct AnimatorGroup {
    children: Vec<Box<dyn Animator>>,
    speed: f32,
    repeat: RepeatMode,
}

impl AnimatorGroup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            speed: 1.0,
            repeat: RepeatMode::default(),
        }
    }

    /// Adds a child animator, bringing it to the group's current speed
    /// and repeat mode
    pub fn add(&mut self, mut animator: Box<dyn Animator>) {
        animator.set_speed(self.speed);
        animator.set_repeat(self.repeat);
        self.children.push(animator);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for AnimatorGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator for AnimatorGroup {
    fn update(
        &mut self,
        timestamp: i64,
        frequency: i64,
        scene: &mut dyn SceneTrait,
    ) {
        for child in &mut self.children {
            child.update(timestamp, frequency, scene);
        }
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        for child in &mut self.children {
            child.set_speed(speed);
        }
    }

    fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        for child in &mut self.children {
            child.set_repeat(mode);
        }
    }
}
