/*!
 * Tests for the host boundary: session providers, environment checks and
 * the mock host
 */

use std::env;

use otio_conform::errors::{HostError, SessionError};
use otio_conform::hosts::mock::{HostOp, MockBinding, MockSession};
use otio_conform::hosts::resolve::{
    ResolveSessionProvider, ScriptEnv, SCRIPT_API_VAR, SCRIPT_LIB_VAR,
};
use otio_conform::hosts::{HostSession, SessionProvider, TimelineHandle, TrackHandle, TrackKind};
use otio_conform::otio_time::{RationalTime, TimeRange};

use crate::common;

fn clear_script_env() {
    unsafe {
        env::remove_var(SCRIPT_LIB_VAR);
        env::remove_var(SCRIPT_API_VAR);
    }
}

fn set_script_env(lib: &str, api: &str) {
    unsafe {
        env::set_var(SCRIPT_LIB_VAR, lib);
        env::set_var(SCRIPT_API_VAR, api);
    }
}

fn env_guard() -> std::sync::MutexGuard<'static, ()> {
    common::ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn test_scriptEnv_withNoVariables_shouldFailOnScriptLibFirst() {
    let _guard = env_guard();
    clear_script_env();

    match ScriptEnv::from_env() {
        Err(SessionError::EnvironmentNotConfigured { var }) => assert_eq!(var, SCRIPT_LIB_VAR),
        other => panic!("expected EnvironmentNotConfigured, got {:?}", other),
    }
}

#[test]
fn test_scriptEnv_withOnlyLibSet_shouldFailOnScriptApi() {
    let _guard = env_guard();
    clear_script_env();
    unsafe {
        env::set_var(SCRIPT_LIB_VAR, "/opt/resolve/libfusionscript.so");
    }

    match ScriptEnv::from_env() {
        Err(SessionError::EnvironmentNotConfigured { var }) => assert_eq!(var, SCRIPT_API_VAR),
        other => panic!("expected EnvironmentNotConfigured, got {:?}", other),
    }
    clear_script_env();
}

#[test]
fn test_scriptEnv_withEmptyVariable_shouldFailAsNotConfigured() {
    let _guard = env_guard();
    clear_script_env();
    set_script_env("", "/opt/resolve/Developer/Scripting");

    assert!(matches!(
        ScriptEnv::from_env(),
        Err(SessionError::EnvironmentNotConfigured { var }) if var == SCRIPT_LIB_VAR
    ));
    clear_script_env();
}

#[test]
fn test_provider_withMissingScriptLibrary_shouldFailAsBindingUnavailable() {
    let _guard = env_guard();
    clear_script_env();
    set_script_env("/definitely/not/libfusionscript.so", "/opt/resolve/dev");

    let provider = ResolveSessionProvider::with_binding(Box::new(MockBinding::working()));
    match provider.acquire() {
        Err(SessionError::BindingUnavailable { reason }) => {
            assert!(reason.contains("does not exist"));
        }
        other => panic!("expected BindingUnavailable, got {:?}", other),
    }
    clear_script_env();
}

#[test]
fn test_provider_withNoBindingRegistered_shouldFailAsBindingUnavailable() {
    let _guard = env_guard();
    clear_script_env();

    let dir = common::create_temp_dir().unwrap();
    let lib = common::create_test_file(&dir.path().to_path_buf(), "libfusionscript.so", "").unwrap();
    set_script_env(lib.to_str().unwrap(), dir.path().to_str().unwrap());

    let provider = ResolveSessionProvider::new();
    match provider.acquire() {
        Err(SessionError::BindingUnavailable { reason }) => {
            assert!(reason.contains("no scripting binding registered"));
        }
        other => panic!("expected BindingUnavailable, got {:?}", other),
    }
    clear_script_env();
}

#[test]
fn test_provider_withRefusingHost_shouldFailAsSessionUnavailable() {
    let _guard = env_guard();
    clear_script_env();

    let dir = common::create_temp_dir().unwrap();
    let lib = common::create_test_file(&dir.path().to_path_buf(), "libfusionscript.so", "").unwrap();
    set_script_env(lib.to_str().unwrap(), dir.path().to_str().unwrap());

    let provider = ResolveSessionProvider::with_binding(Box::new(MockBinding::refusing()));
    match provider.acquire() {
        Err(SessionError::SessionUnavailable { app }) => assert_eq!(app, "Resolve"),
        other => panic!("expected SessionUnavailable, got {:?}", other),
    }
    clear_script_env();
}

#[test]
fn test_provider_withWorkingBinding_shouldAcquireUsableSession() {
    let _guard = env_guard();
    clear_script_env();

    let dir = common::create_temp_dir().unwrap();
    let lib = common::create_test_file(&dir.path().to_path_buf(), "libfusionscript.so", "").unwrap();
    set_script_env(lib.to_str().unwrap(), dir.path().to_str().unwrap());

    let binding = MockBinding::working();
    let ops = binding.ops();
    let provider = ResolveSessionProvider::with_binding(Box::new(binding));
    let mut session = provider.acquire().unwrap();
    session.create_timeline("acquired").unwrap();

    let log = ops.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert!(matches!(&log[0], HostOp::CreateTimeline { name } if name == "acquired"));
    clear_script_env();
}

#[test]
fn test_trackKind_fromOtioKind_shouldMapKnownKindsAndDefaultToVideo() {
    assert_eq!(TrackKind::from_otio_kind("Video"), TrackKind::Video);
    assert_eq!(TrackKind::from_otio_kind("Audio"), TrackKind::Audio);
    assert_eq!(TrackKind::from_otio_kind("Subtitle"), TrackKind::Video);
}

#[test]
fn test_mockSession_failing_shouldRejectEveryCall() {
    let mut session = MockSession::failing();
    assert!(session.create_timeline("nope").is_err());
    assert!(session.op_log().is_empty());
}

#[test]
fn test_mockSession_failAfter_shouldRejectFromNthCall() {
    let mut session = MockSession::fail_after(1);
    assert!(session.create_timeline("first").is_ok());
    match session.op_log().as_slice() {
        [HostOp::CreateTimeline { .. }] => (),
        other => panic!("unexpected op log: {:?}", other),
    }
    let result = session.add_track(TimelineHandle(1), TrackKind::Video, "second");
    assert!(result.is_err());
}

#[test]
fn test_mockSession_withForeignTimelineHandle_shouldFailAsUnknownHandle() {
    let mut session = MockSession::working();
    session.create_timeline("real").unwrap();

    match session.add_track(TimelineHandle(99), TrackKind::Video, "V1") {
        Err(HostError::UnknownHandle { handle }) => assert_eq!(handle, 99),
        other => panic!("expected UnknownHandle, got {:?}", other),
    }
    // Only the timeline made it into the log.
    assert_eq!(session.op_log().len(), 1);
}

#[test]
fn test_mockSession_withForeignTrackHandle_shouldFailAsUnknownHandle() {
    let mut session = MockSession::working();
    let timeline = session.create_timeline("real").unwrap();
    session.add_track(timeline, TrackKind::Video, "V1").unwrap();

    let range = TimeRange::from_duration(RationalTime::new(24.0, 24.0));
    match session.append_gap(TrackHandle(42), range) {
        Err(HostError::UnknownHandle { handle }) => assert_eq!(handle, 42),
        other => panic!("expected UnknownHandle, got {:?}", other),
    }
    assert_eq!(session.op_log().len(), 2);
}

#[test]
fn test_provider_forApp_withRefusingHost_shouldNameRequestedApp() {
    let _guard = env_guard();
    clear_script_env();

    let dir = common::create_temp_dir().unwrap();
    let lib = common::create_test_file(&dir.path().to_path_buf(), "libfusionscript.so", "").unwrap();
    set_script_env(lib.to_str().unwrap(), dir.path().to_str().unwrap());

    let provider =
        ResolveSessionProvider::with_binding(Box::new(MockBinding::refusing())).for_app("Fusion");
    match provider.acquire() {
        Err(SessionError::SessionUnavailable { app }) => assert_eq!(app, "Fusion"),
        other => panic!("expected SessionUnavailable, got {:?}", other),
    }
    clear_script_env();
}
