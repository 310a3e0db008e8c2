use super::{
    types::{Animation, NodeKeyframe},
    util,
};
use crate::{
    clock::PlaybackClock,
    pv_error::PvError,
    transform::{self, Srt},
    types::{Animator, RepeatMode, SceneTrait},
};
use log::debug;
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Selects what a node cursor does when it runs out of keyframes
///
/// `FreezeAtEnd` nodes hold their final keyframe pose until a reset, with
/// the playback policy applied to the whole timeline. `WrapPerNode` nodes
/// each loop over their own keyframe sequence, so nodes with short
/// sequences repeat while longer ones are still on their first pass.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize,
)]
pub enum NodeCursorMode {
    #[default]
    FreezeAtEnd,
    WrapPerNode,
}

/// Playback cursor of one animated scene node
#[derive(Clone, Copy, Debug)]
struct NodeCursor {
    node: usize,
    index: usize,
}

/// Plays per node keyframe sequences onto scene node transforms
///
/// Every animated node keeps its own cursor into its own sequence while
/// one shared clock advances them together. Each update writes the pose of
/// every active node through `SceneTrait`, whether or not it moved. When
/// the animation lists skin meshes, their bone matrices are rebuilt from
/// the freshly written node transforms at the end of any update that
/// changed a node.
pub struct NodeAnimator {
    animation: Arc<Animation>,
    mode: NodeCursorMode,
    cursors: Vec<NodeCursor>,
    clock: PlaybackClock,
    speed: f32,
    repeat: RepeatMode,
    stopped: bool,
    pool: Vec<Vec<glm::Mat4>>,
}

impl NodeAnimator {
    /// Creates an animator for the node keyframes of an animation
    ///
    /// Nodes with an empty keyframe list are skipped. The active node list
    /// is kept sorted by node index so playback order does not depend on
    /// map iteration order.
    ///
    /// # Errors
    /// May return `PvError` if no node has any keyframes or some node's
    /// keyframe times are not sorted ascending
    pub fn new(
        animation: Arc<Animation>,
        mode: NodeCursorMode,
    ) -> Result<Self, PvError> {
        let mut cursors = Vec::new();
        for (&node, keys) in &animation.node_keyframes {
            if keys.is_empty() {
                debug!("node={node} has no keyframes");
                continue;
            }
            if util::first_unsorted(keys).is_some() {
                return Err(PvError::UnsortedNodeTimes(node));
            }
            cursors.push(NodeCursor { node, index: 0 });
        }
        if cursors.is_empty() {
            return Err(PvError::NoKeyframes);
        }
        cursors.sort_unstable_by_key(|cursor| cursor.node);
        debug!(
            "animation={} nodes={} mode={:?}",
            animation.name,
            cursors.len(),
            mode
        );
        Ok(Self {
            animation,
            mode,
            cursors,
            clock: PlaybackClock::new(),
            speed: 1.0,
            repeat: RepeatMode::default(),
            stopped: false,
            pool: Vec::new(),
        })
    }

    /// True once a `PlayOnce` animation has passed its end time
    #[must_use]
    pub const fn stopped(&self) -> bool {
        self.stopped
    }

    #[must_use]
    pub const fn mode(&self) -> NodeCursorMode {
        self.mode
    }

    /// Pose of one node's sequence at a local time, advancing its cursor
    fn sample(
        keys: &[NodeKeyframe],
        cursor: &mut NodeCursor,
        local: f32,
    ) -> Srt {
        // A backward jump in time restarts the forward scan
        if keys[cursor.index].time > local {
            cursor.index = 0;
        }
        while cursor.index + 1 < keys.len()
            && keys[cursor.index + 1].time <= local
        {
            cursor.index += 1;
        }
        if cursor.index + 1 < keys.len() {
            let k0 = &keys[cursor.index];
            let k1 = &keys[cursor.index + 1];
            transform::blend(
                &Srt::from(k0),
                &Srt::from(k1),
                util::weight(k0.time, k1.time, local),
            )
        } else {
            // A single keyframe, or frozen on the last one
            Srt::from(&keys[cursor.index])
        }
    }

    /// Writes every active node's pose for the given time
    fn write_nodes(
        &mut self,
        elapsed: f32,
        scene: &mut dyn SceneTrait,
    ) -> bool {
        let mut changed = false;
        for cursor in &mut self.cursors {
            let Some(keys) = self.animation.node_keyframes.get(&cursor.node)
            else {
                continue;
            };
            let mut local = elapsed;
            if self.mode == NodeCursorMode::WrapPerNode {
                let first = keys[0].time;
                let last = keys[keys.len() - 1].time;
                let period = last - first;
                if local > last {
                    if period > 0.0 {
                        local = (local - first) % period + first;
                        cursor.index = 0;
                    } else {
                        local = last;
                    }
                }
            }
            let pose = Self::sample(keys, cursor, local);
            scene.set_node_transform(cursor.node, &pose.to_mat4());
            changed = true;
        }
        changed
    }

    /// Rebuilds the bone matrices of every skin mesh from the current
    /// scene node transforms
    fn update_skins(&mut self, scene: &mut dyn SceneTrait) {
        for mesh in &self.animation.skin_meshes {
            let mut buffer = self.pool.pop().unwrap_or_default();
            buffer.clear();
            let Some(group) = scene.bone_group(*mesh) else {
                self.pool.push(buffer);
                continue;
            };
            for (node, inverse_bind) in
                group.nodes.iter().zip(&group.inverse_binds)
            {
                let m = scene
                    .node_transform(*node)
                    .unwrap_or_else(glm::Mat4::identity);
                buffer.push(group.inverse_root * m * inverse_bind);
            }
            if let Some(old) = scene.swap_bone_matrices(*mesh, buffer) {
                self.pool.push(old);
            }
        }
    }
}

impl Animator for NodeAnimator {
    fn update(
        &mut self,
        timestamp: i64,
        frequency: i64,
        scene: &mut dyn SceneTrait,
    ) {
        if self.stopped {
            return;
        }
        let mut elapsed = self.clock.seconds(timestamp, frequency, self.speed);
        if elapsed > self.animation.end_time {
            match self.repeat {
                RepeatMode::PlayOnce => {
                    if self.mode == NodeCursorMode::FreezeAtEnd {
                        // Put every node back on its first keyframe pose
                        // before stopping
                        for cursor in &mut self.cursors {
                            cursor.index = 0;
                        }
                        let changed = self.write_nodes(0.0, scene);
                        self.stopped = true;
                        if changed {
                            self.update_skins(scene);
                        }
                    } else {
                        self.stopped = true;
                    }
                    return;
                }
                RepeatMode::PlayOnceHold => {
                    elapsed = self.animation.end_time;
                }
                RepeatMode::Loop => {
                    if self.mode == NodeCursorMode::FreezeAtEnd {
                        for cursor in &mut self.cursors {
                            cursor.index = 0;
                        }
                        self.clock.reset();
                        elapsed = self
                            .clock
                            .seconds(timestamp, frequency, self.speed);
                    }
                    // Wrapping cursors loop on their own
                }
            }
        }

        let changed = self.write_nodes(elapsed, scene);
        if changed {
            self.update_skins(scene);
        }
    }

    fn reset(&mut self) {
        for cursor in &mut self.cursors {
            cursor.index = 0;
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
