//! Swapping the media under a placed clip.
//!
//! The editor has no native replace, so it is composed from primitives:
//! detach the clip's transitions, delete it, place the new media in the
//! freed slot, then rebuild the transitions. Start, duration and the
//! transitions on both edges come out as they went in.

use tracing::{debug, info};

use reslink_core::{MediaKind, ReslinkError, Result};
use reslink_transport::MixSide;

use crate::media_pool::MediaPool;
use crate::media_pool_item::MediaPoolItem;
use crate::timeline::Timeline;
use crate::timeline_item::TimelineItem;

/// Replacement media: a pool item, or a file path imported on demand.
#[derive(Debug, Clone)]
pub enum ReplaceSource {
    Item(MediaPoolItem),
    Path(String),
}

impl From<MediaPoolItem> for ReplaceSource {
    fn from(item: MediaPoolItem) -> Self {
        Self::Item(item)
    }
}

impl From<&MediaPoolItem> for ReplaceSource {
    fn from(item: &MediaPoolItem) -> Self {
        Self::Item(item.clone())
    }
}

impl From<&str> for ReplaceSource {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for ReplaceSource {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl Timeline {
    /// Replace whatever clip starts at `start` on `track_id`.
    ///
    /// Fails with `ReplaceConflict` when no clip starts there. The new clip
    /// plays its source from the first frame for the old clip's length.
    pub fn replace_clip_at(
        &self,
        track_id: i64,
        start: i64,
        source: impl Into<ReplaceSource>,
    ) -> Result<TimelineItem> {
        let session = self.session();
        let target = session
            .clips_on_track(track_id)?
            .into_iter()
            .find(|c| c.position == start)
            .ok_or_else(|| {
                ReslinkError::ReplaceConflict(format!(
                    "no clip starts at frame {start} on track {track_id}"
                ))
            })?;

        let track = session.track(track_id)?;
        let source = source.into();
        let kind = match &source {
            ReplaceSource::Item(item) => item.kind()?,
            ReplaceSource::Path(path) => MediaKind::from_path(path)?,
        };
        if !track.kind.accepts(kind) {
            return Err(ReslinkError::InvalidArgument(format!(
                "{} track {} cannot hold {kind} media",
                track.kind, track.name
            )));
        }
        let item = match source {
            ReplaceSource::Item(item) => item,
            ReplaceSource::Path(path) => MediaPool::new(session.clone()).import_one_into_root(&path)?,
        };

        let left = target.mix(MixSide::Left).copied();
        let right = target.mix(MixSide::Right).copied();
        info!(
            clip = target.id,
            track_id,
            start,
            replacement = item.media_id(),
            left_mix = left.map(|m| m.duration),
            right_mix = right.map(|m| m.duration),
            "replacing clip"
        );

        let old = TimelineItem::new(session.clone(), target.id);
        if left.is_some() {
            self.remove_mix(&old)?;
        }
        if let Some(mix) = right {
            self.remove_mix(&TimelineItem::new(session.clone(), mix.partner))?;
        }

        // Detaching the left transition moved the clip right.
        let slot = old.start()?;
        old.delete()?;
        let placed = self.place(&item, track_id, slot, Some(0), Some(target.duration))?;
        debug!(clip = placed.id(), slot, "replacement placed");

        if let Some(mix) = left {
            let prev = TimelineItem::new(session.clone(), mix.partner);
            self.add_transition_of(&prev, &placed, mix.duration, mix.kind)?;
        }
        if let Some(mix) = right {
            let next = TimelineItem::new(session.clone(), mix.partner);
            self.add_transition_of(&placed, &next, mix.duration, mix.kind)?;
        }
        Ok(placed)
    }

    /// Replace the media under an existing clip.
    pub fn replace_clip(
        &self,
        clip: &TimelineItem,
        source: impl Into<ReplaceSource>,
    ) -> Result<TimelineItem> {
        let info = clip.info().map_err(|e| match e {
            ReslinkError::NotFound(what) => ReslinkError::ReplaceConflict(format!("{what} is gone")),
            other => other,
        })?;
        self.replace_clip_at(info.track_id, info.position, source)
    }
}
