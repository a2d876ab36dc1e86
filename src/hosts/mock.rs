/*!
 * Mock host implementations for testing and dry runs.
 *
 * This module provides an in-memory host that records every construct the
 * importer asks for, plus a mock scripting binding so the full acquisition
 * path can be exercised without a real host process:
 * - `MockSession::working()` - accepts every creation call
 * - `MockSession::failing()` - rejects every creation call
 * - `MockSession::fail_after(n)` - accepts n calls, then rejects
 * - `MockBinding::refusing()` - binding present, host returns no session
 *
 * Sessions only accept handles they issued themselves; anything else is
 * reported as `HostError::UnknownHandle`, like a real host rejecting a
 * stale object reference.
 */

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::HostError;
use crate::hosts::{
    ClipPlacement, HostSession, ItemHandle, ScriptBinding, TimelineHandle, TrackHandle, TrackKind,
    TransitionPlacement,
};
use crate::otio_time::TimeRange;

/// One recorded creation call
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    CreateTimeline {
        name: String,
    },
    AddTrack {
        timeline: TimelineHandle,
        kind: TrackKind,
        name: String,
    },
    AppendClip {
        track: TrackHandle,
        placement: ClipPlacement,
    },
    AppendGap {
        track: TrackHandle,
        record_range: TimeRange,
    },
    AddTransition {
        track: TrackHandle,
        placement: TransitionPlacement,
    },
}

/// Behavior mode for the mock session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Every creation call succeeds
    Working,
    /// Every creation call fails
    Failing,
    /// The first n calls succeed, then every call fails
    FailAfter(usize),
}

/// In-memory host session recording every operation it is asked to perform
#[derive(Debug)]
pub struct MockSession {
    behavior: MockBehavior,
    next_handle: AtomicU64,
    calls: AtomicU64,
    timelines: HashSet<u64>,
    tracks: HashSet<u64>,
    ops: Arc<Mutex<Vec<HostOp>>>,
}

impl MockSession {
    /// Create a new mock session with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        MockSession {
            behavior,
            next_handle: AtomicU64::new(1),
            calls: AtomicU64::new(0),
            timelines: HashSet::new(),
            tracks: HashSet::new(),
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A session that accepts every creation call
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// A session that rejects every creation call
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// A session that accepts n calls and then rejects
    pub fn fail_after(n: usize) -> Self {
        Self::new(MockBehavior::FailAfter(n))
    }

    /// Shared handle to the operation log; stays valid after the session
    /// itself has been handed to an importer and dropped
    pub fn ops(&self) -> Arc<Mutex<Vec<HostOp>>> {
        Arc::clone(&self.ops)
    }

    /// Snapshot of the operations recorded so far
    pub fn op_log(&self) -> Vec<HostOp> {
        self.ops.lock().expect("mock op log poisoned").clone()
    }

    fn admit(&self, operation: &'static str) -> Result<(), HostError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let ok = match self.behavior {
            MockBehavior::Working => true,
            MockBehavior::Failing => false,
            MockBehavior::FailAfter(n) => call < n,
        };
        if ok {
            Ok(())
        } else {
            Err(HostError::CreationFailed {
                operation,
                message: "mock host configured to fail".to_string(),
            })
        }
    }

    fn record(&self, op: HostOp) -> u64 {
        self.ops.lock().expect("mock op log poisoned").push(op);
        self.next_handle.fetch_add(1, Ordering::SeqCst)
    }

    // Handles are only valid if this session issued them; a real host
    // rejects stale object references the same way.
    fn require_timeline(&self, timeline: TimelineHandle) -> Result<(), HostError> {
        if self.timelines.contains(&timeline.0) {
            Ok(())
        } else {
            Err(HostError::UnknownHandle { handle: timeline.0 })
        }
    }

    fn require_track(&self, track: TrackHandle) -> Result<(), HostError> {
        if self.tracks.contains(&track.0) {
            Ok(())
        } else {
            Err(HostError::UnknownHandle { handle: track.0 })
        }
    }
}

impl HostSession for MockSession {
    fn create_timeline(&mut self, name: &str) -> Result<TimelineHandle, HostError> {
        self.admit("create_timeline")?;
        let handle = self.record(HostOp::CreateTimeline {
            name: name.to_string(),
        });
        self.timelines.insert(handle);
        Ok(TimelineHandle(handle))
    }

    fn add_track(
        &mut self,
        timeline: TimelineHandle,
        kind: TrackKind,
        name: &str,
    ) -> Result<TrackHandle, HostError> {
        self.require_timeline(timeline)?;
        self.admit("add_track")?;
        let handle = self.record(HostOp::AddTrack {
            timeline,
            kind,
            name: name.to_string(),
        });
        self.tracks.insert(handle);
        Ok(TrackHandle(handle))
    }

    fn append_clip(
        &mut self,
        track: TrackHandle,
        placement: &ClipPlacement,
    ) -> Result<ItemHandle, HostError> {
        self.require_track(track)?;
        self.admit("append_clip")?;
        let handle = self.record(HostOp::AppendClip {
            track,
            placement: placement.clone(),
        });
        Ok(ItemHandle(handle))
    }

    fn append_gap(
        &mut self,
        track: TrackHandle,
        record_range: TimeRange,
    ) -> Result<ItemHandle, HostError> {
        self.require_track(track)?;
        self.admit("append_gap")?;
        let handle = self.record(HostOp::AppendGap {
            track,
            record_range,
        });
        Ok(ItemHandle(handle))
    }

    fn add_transition(
        &mut self,
        track: TrackHandle,
        placement: &TransitionPlacement,
    ) -> Result<ItemHandle, HostError> {
        self.require_track(track)?;
        self.admit("add_transition")?;
        let handle = self.record(HostOp::AddTransition {
            track,
            placement: placement.clone(),
        });
        Ok(ItemHandle(handle))
    }
}

/// Mock scripting binding handing out mock sessions
#[derive(Debug)]
pub struct MockBinding {
    behavior: MockBehavior,
    refuse: bool,
    ops: Arc<Mutex<Vec<HostOp>>>,
}

impl MockBinding {
    /// Binding whose sessions accept every call
    pub fn working() -> Self {
        MockBinding {
            behavior: MockBehavior::Working,
            refuse: false,
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Binding whose sessions reject every call
    pub fn failing() -> Self {
        MockBinding {
            behavior: MockBehavior::Failing,
            refuse: false,
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Binding that is importable but whose host returns no session
    pub fn refusing() -> Self {
        MockBinding {
            behavior: MockBehavior::Working,
            refuse: true,
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the operation log of every session this binding
    /// hands out
    pub fn ops(&self) -> Arc<Mutex<Vec<HostOp>>> {
        Arc::clone(&self.ops)
    }
}

impl ScriptBinding for MockBinding {
    fn script_app(&self, _app: &str) -> Option<Box<dyn HostSession>> {
        if self.refuse {
            return None;
        }
        let mut session = MockSession::new(self.behavior);
        session.ops = Arc::clone(&self.ops);
        Some(Box::new(session))
    }
}
