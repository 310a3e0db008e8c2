pub mod bone;
pub mod group;
pub mod morph;
pub mod node;
pub mod search;
mod types;
mod util;

// Re-exports
pub use {
    bone::BoneAnimator,
    group::AnimatorGroup,
    morph::MorphAnimator,
    node::{NodeAnimator, NodeCursorMode},
    search::find_bracket,
    types::{
        Animation, Bone, BoneKeyframe, MorphKeyframe, NodeKeyframe, Skeleton,
        Timed,
    },
};
