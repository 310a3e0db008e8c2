//! Keyframe animation playback for skeletal, node and morph target
//! animation
//!
//! The crate turns immutable animation assets into per frame transform
//! data. Bone animators produce skin space matrix arrays for a skinning
//! shader, node animators write model matrices onto scene nodes, and
//! morph animators write weight arrays, all driven by raw performance
//! counter style timestamps. Rendering, asset loading and the scene graph
//! itself stay outside and connect through the traits in [`types`].

pub mod animation;
pub mod clock;
pub mod pv_error;
pub mod transform;
pub mod types;
