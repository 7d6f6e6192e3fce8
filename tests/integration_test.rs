use tpk_backend::error::BackendError;

#[test]
fn test_error_types() {
    let err = BackendError::KubernetesForbidden {
        namespace: "todolist".to_string(),
    };
    assert!(err.to_string().contains("todolist"));

    let err = BackendError::KubernetesApiError {
        reason: "Conflict".to_string(),
        body: "already exists".to_string(),
    };
    assert_eq!(err.to_string(), "Conflict - already exists");

    let err: BackendError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, BackendError::DatabaseError(_)));
}

#[test]
fn test_version_const() {
    assert!(!tpk_backend::VERSION.is_empty());
}
