use std::path::Path;

use log::{debug, info};

use crate::errors::ImportError;
use crate::hosts::{
    ClipPlacement, HostObject, HostSession, ItemHandle, SessionProvider, TimelineHandle,
    TrackHandle, TrackKind, TransitionPlacement,
};
use crate::otio_document::{self, Clip, Gap, Stack, StackChild, Timeline, Track, TrackChild,
    Transition};
use crate::otio_time::{RationalTime, TimeRange};

// @module: Conversion of a parsed OTIO document into host constructs

/// Options controlling a single import
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Override for the created host timeline's name; the stack's own name
    /// is used when absent
    pub timeline_name: Option<String>,
}

/// One node of the timeline document, borrowed for dispatch.
///
/// The set is closed: the reader can only ever produce these six kinds, so
/// `convert` matches exhaustively and an unmapped kind cannot exist at
/// runtime.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Timeline(&'a Timeline),
    Stack(&'a Stack),
    Track(&'a Track),
    Clip(&'a Clip),
    Gap(&'a Gap),
    Transition(&'a Transition),
}

impl Node<'_> {
    /// Kind name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Timeline(_) => "Timeline",
            Node::Stack(_) => "Stack",
            Node::Track(_) => "Track",
            Node::Clip(_) => "Clip",
            Node::Gap(_) => "Gap",
            Node::Transition(_) => "Transition",
        }
    }
}

/// Read an OTIO compatible file and create a representation in the host.
///
/// The session is acquired first, so configuration errors surface before the
/// input path is touched; the document is then fully parsed and validated,
/// so a malformed file never reaches the dispatcher. Returns the handle of
/// the created root construct. There is no partial-success mode: one root
/// handle, or one error.
pub fn import_file<P: AsRef<Path>>(
    path: P,
    provider: &dyn SessionProvider,
) -> Result<HostObject, ImportError> {
    import_file_with_options(path, provider, ImportOptions::default())
}

/// `import_file` with explicit options
pub fn import_file_with_options<P: AsRef<Path>>(
    path: P,
    provider: &dyn SessionProvider,
    options: ImportOptions,
) -> Result<HostObject, ImportError> {
    let mut session = provider.acquire()?;
    debug!("host session object: {:?}", session);

    let timeline = otio_document::read_from_file(path.as_ref())?;
    info!(
        "conforming '{}' ({} track(s)) from {}",
        timeline.name,
        timeline.flattened_tracks().len(),
        path.as_ref().display()
    );

    let mut importer = Importer::with_options(session.as_mut(), options);
    importer.convert(Node::Timeline(&timeline), None)
}

/// Converts timeline-document nodes into host constructs through a borrowed
/// session.
///
/// The session is owned by the host process; the importer only issues
/// creation requests through it for the duration of one import and never
/// manages its lifecycle.
#[derive(Debug)]
pub struct Importer<'a> {
    session: &'a mut dyn HostSession,
    options: ImportOptions,
    current_timeline: Option<TimelineHandle>,
}

impl<'a> Importer<'a> {
    /// New importer over a borrowed host session
    pub fn new(session: &'a mut dyn HostSession) -> Self {
        Self::with_options(session, ImportOptions::default())
    }

    /// New importer with explicit options
    pub fn with_options(session: &'a mut dyn HostSession, options: ImportOptions) -> Self {
        Importer {
            session,
            options,
            current_timeline: None,
        }
    }

    /// Map a document node onto host constructs.
    ///
    /// Every kind produces at least one host call (or a host error); there
    /// is no silent no-op arm. `track_kind` threads the enclosing track's
    /// kind down to children, overriding their own kind strings.
    pub fn convert(
        &mut self,
        node: Node<'_>,
        track_kind: Option<TrackKind>,
    ) -> Result<HostObject, ImportError> {
        debug!("convert {} node", node.kind());
        match node {
            // A timeline creates nothing itself; its stack is the real root
            // of host-side construction.
            Node::Timeline(timeline) => self.convert(Node::Stack(&timeline.tracks), track_kind),

            Node::Stack(stack) => self.create_stack(stack, track_kind),

            Node::Track(track) => {
                let timeline = self.ensure_timeline()?;
                let handle = self.create_track(timeline, track, track_kind)?;
                Ok(HostObject::Track(handle))
            }

            Node::Clip(clip) => {
                let (track, cursor) = self.ensure_track(track_kind)?;
                let handle = self.place_clip(track, clip, cursor)?.0;
                Ok(HostObject::Item(handle))
            }

            Node::Gap(gap) => {
                let (track, cursor) = self.ensure_track(track_kind)?;
                let handle = self.place_gap(track, gap, cursor)?.0;
                Ok(HostObject::Item(handle))
            }

            Node::Transition(transition) => {
                let (track, cursor) = self.ensure_track(track_kind)?;
                let handle = self.place_transition(track, transition, cursor)?;
                Ok(HostObject::Item(handle))
            }
        }
    }

    // A stack becomes a host timeline; its tracks (nested stacks flattened,
    // in order) are appended to it.
    fn create_stack(
        &mut self,
        stack: &Stack,
        track_kind: Option<TrackKind>,
    ) -> Result<HostObject, ImportError> {
        let name = self
            .options
            .timeline_name
            .clone()
            .unwrap_or_else(|| default_name(&stack.name, "Timeline"));
        let timeline = self.session.create_timeline(&name)?;
        self.current_timeline = Some(timeline);
        self.append_stack_tracks(timeline, stack, track_kind)?;
        Ok(HostObject::Timeline(timeline))
    }

    fn append_stack_tracks(
        &mut self,
        timeline: TimelineHandle,
        stack: &Stack,
        track_kind: Option<TrackKind>,
    ) -> Result<(), ImportError> {
        for child in &stack.children {
            match child {
                StackChild::Track(track) => {
                    self.create_track(timeline, track, track_kind)?;
                }
                StackChild::Stack(inner) => {
                    self.append_stack_tracks(timeline, inner, track_kind)?;
                }
            }
        }
        Ok(())
    }

    // A track is created empty, then its children are placed left to right
    // with a record-time cursor: clips and gaps advance it by their duration
    // (rescaled to the cursor's rate), transitions anchor to the current cut
    // without advancing.
    fn create_track(
        &mut self,
        timeline: TimelineHandle,
        track: &Track,
        inherited_kind: Option<TrackKind>,
    ) -> Result<TrackHandle, ImportError> {
        let kind = inherited_kind.unwrap_or_else(|| TrackKind::from_otio_kind(&track.kind));
        let name = default_name(&track.name, "Track");
        let handle = self.session.add_track(timeline, kind, &name)?;

        let mut cursor: Option<RationalTime> = None;
        for child in &track.children {
            cursor = Some(match child {
                TrackChild::Clip(clip) => self.place_clip(handle, clip, cursor)?.1,
                TrackChild::Gap(gap) => self.place_gap(handle, gap, cursor)?.1,
                TrackChild::Transition(transition) => {
                    self.place_transition(handle, transition, cursor)?;
                    cursor.unwrap_or_else(|| RationalTime::zero(24.0))
                }
            });
        }

        debug!(
            "track '{}' ({}) conformed with {} item(s)",
            name,
            kind,
            track.children.len()
        );
        Ok(handle)
    }

    fn place_clip(
        &mut self,
        track: TrackHandle,
        clip: &Clip,
        cursor: Option<RationalTime>,
    ) -> Result<(ItemHandle, RationalTime), ImportError> {
        let source_range = clip.resolved_source_range()?;
        let start = cursor.unwrap_or_else(|| RationalTime::zero(source_range.duration.rate));
        let record_range = TimeRange::new(start, source_range.duration);
        let placement = ClipPlacement {
            name: default_name(&clip.name, "Clip"),
            media_url: clip.media_url().map(str::to_string),
            source_range,
            record_range,
        };
        let handle = self.session.append_clip(track, &placement)?;
        Ok((handle, record_range.end_time_exclusive()))
    }

    fn place_gap(
        &mut self,
        track: TrackHandle,
        gap: &Gap,
        cursor: Option<RationalTime>,
    ) -> Result<(ItemHandle, RationalTime), ImportError> {
        let duration = gap.resolved_duration()?;
        let start = cursor.unwrap_or_else(|| RationalTime::zero(duration.rate));
        let record_range = TimeRange::new(start, duration);
        let handle = self.session.append_gap(track, record_range)?;
        Ok((handle, record_range.end_time_exclusive()))
    }

    fn place_transition(
        &mut self,
        track: TrackHandle,
        transition: &Transition,
        cursor: Option<RationalTime>,
    ) -> Result<ItemHandle, ImportError> {
        let fallback_rate = transition
            .in_offset
            .or(transition.out_offset)
            .map(|t| t.rate)
            .unwrap_or(24.0);
        let cut_point = cursor.unwrap_or_else(|| RationalTime::zero(fallback_rate));
        let placement = TransitionPlacement {
            name: default_name(&transition.name, "Transition"),
            transition_type: transition.transition_type.clone(),
            cut_point,
            in_offset: transition
                .in_offset
                .unwrap_or_else(|| RationalTime::zero(fallback_rate)),
            out_offset: transition
                .out_offset
                .unwrap_or_else(|| RationalTime::zero(fallback_rate)),
        };
        let handle = self.session.add_transition(track, &placement)?;
        Ok(handle)
    }

    // Implicit context for items dispatched without a parent: an untitled
    // host timeline and a track of the requested kind.
    fn ensure_timeline(&mut self) -> Result<TimelineHandle, ImportError> {
        if let Some(handle) = self.current_timeline {
            return Ok(handle);
        }
        let name = self
            .options
            .timeline_name
            .clone()
            .unwrap_or_else(|| "Timeline".to_string());
        let handle = self.session.create_timeline(&name)?;
        self.current_timeline = Some(handle);
        Ok(handle)
    }

    fn ensure_track(
        &mut self,
        track_kind: Option<TrackKind>,
    ) -> Result<(TrackHandle, Option<RationalTime>), ImportError> {
        let timeline = self.ensure_timeline()?;
        let kind = track_kind.unwrap_or(TrackKind::Video);
        let name = match kind {
            TrackKind::Video => "Video 1",
            TrackKind::Audio => "Audio 1",
        };
        let handle = self.session.add_track(timeline, kind, name)?;
        Ok((handle, None))
    }
}

fn default_name(name: &str, fallback: &str) -> String {
    if name.trim().is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}
