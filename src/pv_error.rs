use std::{error, fmt};

/// Unified error type
///
/// Animator constructors validate their input data and return one of these
/// instead of building an animator that would misbehave at playback time.
/// Playing back corrupt animation data produces undefined visual results
/// that are worse than a hard failure, so nothing here is deferred to
/// `update`.
///
/// Conditions that are expected during playback, such as a node with no
/// keyframes, are not errors. Those are skipped by the animators and do
/// not appear in this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PvError {
    NoKeyframes,
    NoBones,
    UnsortedTimes(usize),
    UnsortedNodeTimes(usize),
    BoneIndexRange(usize),
    ParentIndexRange(usize),
    ParentOrder(usize),
}

impl error::Error for PvError {}

impl fmt::Display for PvError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoKeyframes => {
                write!(f, "animation contains no keyframes")
            }
            Self::NoBones => write!(f, "skeleton contains no bones"),
            Self::UnsortedTimes(index) => {
                write!(f, "keyframe {index} is out of time order")
            }
            Self::UnsortedNodeTimes(node) => {
                write!(f, "keyframes for node {node} are out of time order")
            }
            Self::BoneIndexRange(index) => {
                write!(
                    f,
                    "keyframe {index} references a bone that does not exist"
                )
            }
            Self::ParentIndexRange(bone) => {
                write!(f, "bone {bone} has an out of range parent index")
            }
            Self::ParentOrder(bone) => {
                write!(f, "bone {bone} appears before its parent")
            }
        }
    }
}
