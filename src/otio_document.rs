use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DocumentError;
use crate::otio_time::{RationalTime, TimeRange};

// @module: OTIO interchange document model and reader

/// Key used by OTIO for the default entry of a Clip.2 media reference map
pub const DEFAULT_MEDIA_KEY: &str = "DEFAULT_MEDIA";

// @struct: Root of a parsed interchange file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    // @field: Timeline display name
    #[serde(default)]
    pub name: String,

    // @field: Optional record start of the whole timeline
    #[serde(default)]
    pub global_start_time: Option<RationalTime>,

    // @field: Top-level stack of tracks; the real root of host-side construction
    pub tracks: Stack,

    // @field: Opaque application metadata, carried but never interpreted
    #[serde(default)]
    pub metadata: Value,
}

/// A group of tracks (or nested stacks), ordered bottom to top
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stack {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub children: Vec<StackChild>,

    #[serde(default)]
    pub metadata: Value,
}

/// A single track: an ordered run of clips, gaps and transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub name: String,

    // @field: OTIO track kind string, typically "Video" or "Audio"
    #[serde(default = "default_track_kind")]
    pub kind: String,

    #[serde(default)]
    pub children: Vec<TrackChild>,

    #[serde(default)]
    pub metadata: Value,
}

fn default_track_kind() -> String {
    "Video".to_string()
}

/// A piece of media placed on a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default)]
    pub name: String,

    // @field: Trimmed range of the media used by this clip
    #[serde(default)]
    pub source_range: Option<TimeRange>,

    // @field: Clip.1 single media reference
    #[serde(default)]
    pub media_reference: Option<MediaReference>,

    // @field: Clip.2 media reference map
    #[serde(default)]
    pub media_references: HashMap<String, MediaReference>,

    // @field: Clip.2 selector into the media reference map
    #[serde(default)]
    pub active_media_reference_key: Option<String>,

    #[serde(default)]
    pub metadata: Value,
}

/// Empty space on a track; occupies record time but references no media
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub source_range: Option<TimeRange>,

    #[serde(default)]
    pub metadata: Value,
}

/// A transition overlapping the cut between two adjacent items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default)]
    pub name: String,

    // @field: Transition flavor, e.g. "SMPTE_Dissolve"
    #[serde(default)]
    pub transition_type: Option<String>,

    // @field: Reach back into the outgoing item
    #[serde(default)]
    pub in_offset: Option<RationalTime>,

    // @field: Reach forward into the incoming item
    #[serde(default)]
    pub out_offset: Option<RationalTime>,

    #[serde(default)]
    pub metadata: Value,
}

/// Closed set of nodes that may appear inside a Stack.
///
/// The OTIO_SCHEMA tag selects the variant; an unrecognized tag fails
/// deserialization, so an unmapped node kind can never reach the importer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "OTIO_SCHEMA")]
pub enum StackChild {
    #[serde(rename = "Track.1", alias = "Sequence.1")]
    Track(Track),

    #[serde(rename = "Stack.1")]
    Stack(Stack),
}

/// Closed set of nodes that may appear inside a Track
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "OTIO_SCHEMA")]
pub enum TrackChild {
    #[serde(rename = "Clip.1", alias = "Clip.2")]
    Clip(Clip),

    #[serde(rename = "Gap.1", alias = "Filler.1")]
    Gap(Gap),

    #[serde(rename = "Transition.1")]
    Transition(Transition),
}

/// Media pointed at by a clip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "OTIO_SCHEMA")]
pub enum MediaReference {
    #[serde(rename = "ExternalReference.1")]
    External {
        #[serde(default)]
        target_url: Option<String>,

        #[serde(default)]
        available_range: Option<TimeRange>,
    },

    #[serde(rename = "MissingReference.1")]
    Missing {
        #[serde(default)]
        available_range: Option<TimeRange>,
    },

    #[serde(rename = "GeneratorReference.1")]
    Generator {
        #[serde(default)]
        generator_kind: String,

        #[serde(default)]
        available_range: Option<TimeRange>,
    },
}

impl MediaReference {
    /// The range of media this reference makes available, if known
    pub fn available_range(&self) -> Option<&TimeRange> {
        match self {
            MediaReference::External {
                available_range, ..
            }
            | MediaReference::Missing { available_range }
            | MediaReference::Generator {
                available_range, ..
            } => available_range.as_ref(),
        }
    }
}

// Top-level schema dispatch; only Timeline roots are accepted.
#[derive(Debug, Deserialize)]
#[serde(tag = "OTIO_SCHEMA")]
enum Root {
    #[serde(rename = "Timeline.1")]
    Timeline(Timeline),
}

impl Clip {
    /// The media reference in effect, covering both Clip.1 and Clip.2 shapes
    pub fn active_media(&self) -> Option<&MediaReference> {
        if let Some(media) = &self.media_reference {
            return Some(media);
        }
        let key = self
            .active_media_reference_key
            .as_deref()
            .unwrap_or(DEFAULT_MEDIA_KEY);
        self.media_references.get(key)
    }

    /// Path or URL of the media file, when the reference is external
    pub fn media_url(&self) -> Option<&str> {
        match self.active_media() {
            Some(MediaReference::External { target_url, .. }) => target_url.as_deref(),
            _ => None,
        }
    }

    /// The range of media this clip plays: its trim if present, otherwise
    /// everything the media makes available
    pub fn resolved_source_range(&self) -> Result<TimeRange, DocumentError> {
        if let Some(range) = self.source_range {
            return Ok(range);
        }
        if let Some(range) = self.active_media().and_then(|m| m.available_range()) {
            return Ok(*range);
        }
        Err(DocumentError::UnresolvedDuration {
            item: self.name.clone(),
        })
    }
}

impl Gap {
    /// How long this gap holds the track open
    pub fn resolved_duration(&self) -> Result<RationalTime, DocumentError> {
        match self.source_range {
            Some(range) => Ok(range.duration),
            None => Err(DocumentError::UnresolvedDuration {
                item: self.name.clone(),
            }),
        }
    }
}

impl Track {
    /// Total record duration of the track contents, at the rate of the
    /// first timed item (24 fps when the track is empty)
    pub fn playback_duration(&self) -> RationalTime {
        let mut total: Option<RationalTime> = None;
        for child in &self.children {
            let duration = match child {
                TrackChild::Clip(clip) => clip
                    .resolved_source_range()
                    .map(|r| r.duration)
                    .unwrap_or_else(|_| RationalTime::zero(24.0)),
                TrackChild::Gap(gap) => gap
                    .resolved_duration()
                    .unwrap_or_else(|_| RationalTime::zero(24.0)),
                TrackChild::Transition(_) => continue,
            };
            total = Some(match total {
                Some(t) => t.adding(&duration),
                None => duration,
            });
        }
        total.unwrap_or_else(|| RationalTime::zero(24.0))
    }
}

impl Timeline {
    /// All tracks in the top-level stack, nested stacks flattened in order
    pub fn flattened_tracks(&self) -> Vec<&Track> {
        fn walk<'a>(stack: &'a Stack, out: &mut Vec<&'a Track>) {
            for child in &stack.children {
                match child {
                    StackChild::Track(track) => out.push(track),
                    StackChild::Stack(inner) => walk(inner, out),
                }
            }
        }
        let mut tracks = Vec::new();
        walk(&self.tracks, &mut tracks);
        tracks
    }
}

/// Parse an OTIO document from a JSON string and validate it.
pub fn read_from_string(content: &str) -> Result<Timeline, DocumentError> {
    let Root::Timeline(timeline) = serde_json::from_str(content)?;
    validate(&timeline)?;
    debug!(
        "parsed timeline '{}' with {} track(s)",
        timeline.name,
        timeline.flattened_tracks().len()
    );
    Ok(timeline)
}

/// Read an OTIO compatible file from disk.
///
/// Any failure here is a document error; the caller must not have issued any
/// host calls yet when this is invoked.
pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Timeline, DocumentError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_from_string(&content)
}

// Structural validation: every placed item must have a resolvable, sane
// duration before the dispatcher is allowed to see the document.
fn validate(timeline: &Timeline) -> Result<(), DocumentError> {
    for track in timeline.flattened_tracks() {
        for child in &track.children {
            match child {
                TrackChild::Clip(clip) => {
                    let range = clip.resolved_source_range()?;
                    check_duration(&clip.name, &range.duration)?;
                }
                TrackChild::Gap(gap) => {
                    let duration = gap.resolved_duration()?;
                    check_duration(&gap.name, &duration)?;
                }
                TrackChild::Transition(transition) => {
                    if transition.in_offset.is_none() && transition.out_offset.is_none() {
                        warn!(
                            "transition '{}' has no offsets; treating as a hard cut overlay",
                            transition.name
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_duration(item: &str, duration: &RationalTime) -> Result<(), DocumentError> {
    if duration.is_valid_duration() {
        Ok(())
    } else {
        Err(DocumentError::InvalidDuration {
            item: item.to_string(),
            duration: duration.value,
            rate: duration.rate,
        })
    }
}
