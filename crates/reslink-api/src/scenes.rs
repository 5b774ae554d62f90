//! Scene cues: turning a scene list into an append batch.

use serde::{Deserialize, Serialize};

use crate::append::{AppendInput, SubClip};
use crate::media_pool_item::MediaPoolItem;

/// One scene of a script: its number, target length in frames and the
/// section it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCue {
    pub index: u32,
    pub duration: i64,
    pub section: String,
}

/// Pair cues with clips in order and cut each clip to its cue's length.
///
/// A cue without a positive duration takes the whole clip. Extra cues or
/// extra clips are dropped.
pub fn scene_batch(cues: &[SceneCue], clips: &[MediaPoolItem]) -> AppendInput {
    AppendInput::SubClips(
        cues.iter()
            .zip(clips)
            .map(|(cue, clip)| {
                let sub = SubClip::new(clip.clone());
                if cue.duration > 0 {
                    sub.range(0, cue.duration - 1)
                } else {
                    sub
                }
            })
            .collect(),
    )
}
