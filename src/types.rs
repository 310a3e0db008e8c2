use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// Playback completion policy
///
/// `PlayOnce` stops updating once the end time has passed, leaving the last
/// computed pose in place. `PlayOnceHold` keeps computing with the time
/// clamped to the end of the animation, so the final pose is exact.
/// `Loop` restarts from time zero and continues forever.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize,
)]
pub enum RepeatMode {
    #[default]
    PlayOnce,
    PlayOnceHold,
    Loop,
}

/// Bone data for a mesh skinned from scene node transforms
///
/// `nodes` lists the scene node driving each bone, with `inverse_binds`
/// holding the matching inverse bind matrix. `inverse_root` is the inverse
/// of the mesh's root transform, applied so the bone matrices end up
/// relative to the mesh instead of the scene. The skin matrix for bone `i`
/// is `inverse_root * node_transform * inverse_binds[i]` in the column
/// vector convention used throughout this crate.
#[derive(Clone, Debug)]
pub struct BoneGroup {
    pub nodes: Vec<usize>,
    pub inverse_binds: Vec<glm::Mat4>,
    pub inverse_root: glm::Mat4,
}

/// Trait for write access to the scene and mesh layer
///
/// The animators do not own scene nodes or meshes. Each `update` call is
/// given one of these instead, and every observable effect of node and
/// morph animation goes through it. Nodes and meshes are addressed by the
/// indices stored in the animation asset. A `None` return means the node
/// or mesh does not exist (or is not skinnable); animators skip those
/// rather than fail.
pub trait SceneTrait {
    /// Returns the current model transform of a scene node
    fn node_transform(&self, node: usize) -> Option<glm::Mat4>;

    /// Writes the model transform of a scene node
    fn set_node_transform(&mut self, node: usize, matrix: &glm::Mat4);

    /// Returns the bone group of a mesh, or `None` if the mesh is not
    /// renderable or has no bone group
    fn bone_group(&self, mesh: usize) -> Option<&BoneGroup>;

    /// Replaces a mesh's bone matrix buffer, returning the previous buffer
    /// so the caller can reuse its allocation
    fn swap_bone_matrices(
        &mut self,
        mesh: usize,
        matrices: Vec<glm::Mat4>,
    ) -> Option<Vec<glm::Mat4>>;

    /// Returns the morph target weight array of a mesh
    fn morph_weights_mut(&mut self, mesh: usize) -> Option<&mut [f32]>;

    /// Signals that a mesh's morph target weights were written this frame
    fn morph_weights_changed(&mut self, mesh: usize);
}

/// Trait for anything that plays back animation over time
///
/// `timestamp` is in integer ticks with `frequency` ticks per second, the
/// way a platform performance counter reports time. The first `update`
/// call latches the timestamp as the start of playback. Implementations
/// must be safe to call every frame with a monotonically increasing
/// timestamp and must never panic on times past the end of the animation.
pub trait Animator {
    /// Advances playback to the given time and writes the results
    fn update(
        &mut self,
        timestamp: i64,
        frequency: i64,
        scene: &mut dyn SceneTrait,
    );

    /// Rewinds playback so the next `update` restarts from time zero
    fn reset(&mut self);

    /// Playback rate multiplier
    #[must_use]
    fn speed(&self) -> f32;

    /// Sets the playback rate multiplier
    ///
    /// The multiplier rescales the whole elapsed time, including time
    /// already played, so changing it mid playback jumps the pose to
    /// where the new rate would have put it. Callers wanting a smooth
    /// rate change should `reset` or swap animators instead.
    fn set_speed(&mut self, speed: f32);

    /// Playback completion policy
    #[must_use]
    fn repeat(&self) -> RepeatMode;

    fn set_repeat(&mut self, mode: RepeatMode);
}
