/*!
 * Host application boundary.
 *
 * This module defines the interface the importer drives to materialize
 * timeline constructs inside an editing host:
 * - `resolve`: session provider for DaVinci Resolve's scripting environment
 * - `mock`: recording in-memory host for tests and dry runs
 */

use std::fmt;
use std::fmt::Debug;

use crate::errors::{HostError, SessionError};
use crate::otio_time::{RationalTime, TimeRange};

pub mod mock;
pub mod resolve;

/// Kind of track a host is asked to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    /// Map an OTIO track kind string onto the host vocabulary; anything
    /// unrecognized conforms as video, matching host behavior for custom kinds
    pub fn from_otio_kind(kind: &str) -> Self {
        match kind {
            "Audio" => TrackKind::Audio,
            _ => TrackKind::Video,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
        }
    }
}

/// Opaque handle to a host-side timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineHandle(pub u64);

/// Opaque handle to a host-side track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackHandle(pub u64);

/// Opaque handle to a host-side placed item (clip, gap or transition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle(pub u64);

/// Whatever construct a conversion produced on the host side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostObject {
    Timeline(TimelineHandle),
    Track(TrackHandle),
    Item(ItemHandle),
}

/// Everything the host needs to place a clip on a track
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlacement {
    /// Clip display name
    pub name: String,
    /// Media path or URL, when the clip references external media
    pub media_url: Option<String>,
    /// Trimmed range of the source media
    pub source_range: TimeRange,
    /// Where the clip lands on the track's record timeline
    pub record_range: TimeRange,
}

/// Everything the host needs to place a transition at a cut
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlacement {
    /// Transition display name
    pub name: String,
    /// Transition flavor, e.g. "SMPTE_Dissolve"
    pub transition_type: Option<String>,
    /// Record time of the cut the transition straddles
    pub cut_point: RationalTime,
    /// Reach back into the outgoing item
    pub in_offset: RationalTime,
    /// Reach forward into the incoming item
    pub out_offset: RationalTime,
}

/// Common trait for all editing-host sessions
///
/// This trait defines the construct-creation surface the importer drives,
/// allowing host backends to be used interchangeably. The session is owned
/// by the host process; implementations only issue requests through it and
/// never manage its lifecycle.
pub trait HostSession: Debug {
    /// Create a new, empty timeline in the host project
    fn create_timeline(&mut self, name: &str) -> Result<TimelineHandle, HostError>;

    /// Add a track of the given kind to a timeline
    fn add_track(
        &mut self,
        timeline: TimelineHandle,
        kind: TrackKind,
        name: &str,
    ) -> Result<TrackHandle, HostError>;

    /// Place a clip at its record range on a track
    fn append_clip(
        &mut self,
        track: TrackHandle,
        placement: &ClipPlacement,
    ) -> Result<ItemHandle, HostError>;

    /// Hold a track open over a record range without media
    fn append_gap(
        &mut self,
        track: TrackHandle,
        record_range: TimeRange,
    ) -> Result<ItemHandle, HostError>;

    /// Attach a transition straddling a cut on a track
    fn add_transition(
        &mut self,
        track: TrackHandle,
        placement: &TransitionPlacement,
    ) -> Result<ItemHandle, HostError>;
}

/// Vendor-supplied entry point into a host's scripting runtime.
///
/// This is the seam the host module injects into session providers so the
/// importer can be exercised with no real host process present.
pub trait ScriptBinding: Debug {
    /// Request a session for the named application, `None` when the host
    /// refuses (wrong edition, not running, outside the host console)
    fn script_app(&self, app: &str) -> Option<Box<dyn HostSession>>;
}

/// Common trait for anything that can hand the importer a host session
pub trait SessionProvider: Debug {
    /// Acquire a session, failing with a configuration error when the
    /// environment or the host is not ready; never retried
    fn acquire(&self) -> Result<Box<dyn HostSession>, SessionError>;
}
