use crate::{pv_error::PvError, transform::Srt};
use ahash::HashMap;
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// Trait for anything with a position on a timeline
pub trait Timed {
    fn time(&self) -> f32;
}

/// One sample of the shared bone timeline
///
/// Keyframes for all bones of an animation are stored in a single time
/// sorted sequence. `bone` says which bone a sample belongs to, so several
/// samples at the same time form one synchronized slice of the skeleton.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoneKeyframe {
    pub time: f32,
    pub bone: usize,
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

/// One sample of a single scene node's timeline
///
/// Unlike `BoneKeyframe` these are not interleaved. Each animated node has
/// its own time sorted sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeKeyframe {
    pub time: f32,
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

/// One sample of a morph target weight
///
/// Stored in a single shared sequence with `target` saying which morph
/// target a sample belongs to. The sequence does not need to be pre-sorted
/// since the morph animator groups and sorts per target when constructed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MorphKeyframe {
    pub time: f32,
    pub target: usize,
    pub weight: f32,
}

impl Timed for BoneKeyframe {
    fn time(&self) -> f32 {
        self.time
    }
}

impl Timed for NodeKeyframe {
    fn time(&self) -> f32 {
        self.time
    }
}

impl Timed for MorphKeyframe {
    fn time(&self) -> f32 {
        self.time
    }
}

impl From<&BoneKeyframe> for Srt {
    fn from(k: &BoneKeyframe) -> Self {
        Self {
            scale: k.scale,
            rotation: k.rotation,
            translation: k.translation,
        }
    }
}

impl From<&NodeKeyframe> for Srt {
    fn from(k: &NodeKeyframe) -> Self {
        Self {
            scale: k.scale,
            rotation: k.rotation,
            translation: k.translation,
        }
    }
}

/// A rigid node of a skeletal hierarchy
///
/// `parent` is `None` only for the root. Parents must appear at a lower
/// index than any of their children so that one forward pass over the bone
/// list can compose the hierarchy. `Skeleton::validate` checks this.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    pub inverse_bind: glm::Mat4,
    pub bind: glm::Mat4,
}

/// An ordered list of bones forming one skeleton
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Skeleton {
    pub name: String,
    pub bones: Vec<Bone>,
}

impl Skeleton {
    /// Checks the bone list invariants needed for playback
    ///
    /// # Errors
    /// May return `PvError` if the skeleton is empty or a parent index is
    /// out of range or not lower than its child
    pub fn validate(&self) -> Result<(), PvError> {
        if self.bones.is_empty() {
            return Err(PvError::NoBones);
        }
        for (i, bone) in self.bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= self.bones.len() {
                    return Err(PvError::ParentIndexRange(i));
                }
                if parent >= i {
                    return Err(PvError::ParentOrder(i));
                }
            }
        }
        Ok(())
    }
}

/// Animation data loaded from an asset
///
/// This is the read-only side of playback. An `Animation` is built once by
/// a loader and then shared by any number of animator instances, which keep
/// their own cursors and clocks. Any of the three keyframe collections may
/// be empty when an asset only animates some of the systems.
///
/// `start_time` and `end_time` bound the timeline in seconds. `skin_meshes`
/// lists meshes whose bone matrices are driven from scene node transforms
/// by the node animator rather than from the bone timeline.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub bone_keyframes: Vec<BoneKeyframe>,
    pub node_keyframes: HashMap<usize, Vec<NodeKeyframe>>,
    pub morph_keyframes: Vec<MorphKeyframe>,
    pub start_time: f32,
    pub end_time: f32,
    pub skin_meshes: Vec<usize>,
}
