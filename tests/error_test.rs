use jcut_regress::{RegressError, Result};

#[test]
fn test_precondition_error() {
    let err = RegressError::Precondition("wrong directory".to_string());
    assert_eq!(err.to_string(), "wrong directory");
    assert!(err.is_precondition());
}

#[test]
fn test_launch_error_keeps_source() {
    let source = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
    let err = RegressError::Launch {
        binary: "/opt/jcut".to_string(),
        source,
    };
    assert_eq!(
        err.to_string(),
        "failed to launch /opt/jcut: No such file or directory"
    );
    assert!(!err.is_precondition());
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_capture_error_names_the_file() {
    let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
    let err = RegressError::Capture {
        path: "tests/groupA/stdout.txt".to_string(),
        source,
    };
    assert_eq!(
        err.to_string(),
        "failed to create tests/groupA/stdout.txt: Permission denied"
    );
    assert!(!err.is_precondition());
}

#[test]
fn test_result_type() {
    fn returns_error() -> Result<()> {
        Err(RegressError::Precondition("test".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
    match result {
        Err(RegressError::Precondition(msg)) => assert_eq!(msg, "test"),
        _ => panic!("Expected Precondition"),
    }
}
