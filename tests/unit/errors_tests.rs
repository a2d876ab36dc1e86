/*!
 * Tests for error types and conversions
 */

use otio_conform::errors::{DocumentError, HostError, ImportError, SessionError};

#[test]
fn test_sessionError_environmentNotConfigured_shouldNameTheVariable() {
    let error = SessionError::EnvironmentNotConfigured {
        var: "RESOLVE_SCRIPT_LIB",
    };
    let display = format!("{}", error);
    assert!(display.contains("RESOLVE_SCRIPT_LIB"));
    assert!(display.contains("not set"));
}

#[test]
fn test_sessionError_sessionUnavailable_shouldNameTheApp() {
    let error = SessionError::SessionUnavailable {
        app: "Resolve".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Resolve"));
    assert!(display.contains("license"));
}

#[test]
fn test_documentError_io_shouldIncludePathAndCause() {
    let error = DocumentError::Io {
        path: "/tmp/cut.otio".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    };
    let display = format!("{}", error);
    assert!(display.contains("/tmp/cut.otio"));
    assert!(display.contains("no such file"));
}

#[test]
fn test_documentError_unresolvedDuration_shouldNameTheItem() {
    let error = DocumentError::UnresolvedDuration {
        item: "shot_030".to_string(),
    };
    assert!(format!("{}", error).contains("shot_030"));
}

#[test]
fn test_importError_fromSessionError_shouldWrapCorrectly() {
    let error: ImportError = SessionError::EnvironmentNotConfigured {
        var: "RESOLVE_SCRIPT_API",
    }
    .into();
    assert!(matches!(error, ImportError::Session(_)));
    assert!(format!("{}", error).contains("RESOLVE_SCRIPT_API"));
}

#[test]
fn test_importError_fromDocumentError_shouldWrapAsParse() {
    let error: ImportError = DocumentError::UnresolvedDuration {
        item: "x".to_string(),
    }
    .into();
    assert!(matches!(error, ImportError::Parse(_)));
    assert!(format!("{}", error).contains("document parse error"));
}

#[test]
fn test_importError_fromHostError_shouldWrapCorrectly() {
    let error: ImportError = HostError::CreationFailed {
        operation: "append_clip",
        message: "track is locked".to_string(),
    }
    .into();
    assert!(matches!(error, ImportError::Host(_)));
    let display = format!("{}", error);
    assert!(display.contains("append_clip"));
    assert!(display.contains("track is locked"));
}
