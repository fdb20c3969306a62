//! Classification rules for service failures.

use std::error::Error as _;

use rstest::rstest;

use super::*;

fn transport(status: Option<u16>, message: &str) -> ServiceError {
    GraphqlTransportError::transport(status, message).into()
}

fn protocol(message: &str, code: Option<&str>) -> ServiceError {
    GraphqlTransportError::protocol(message, code.map(str::to_owned)).into()
}

#[rstest]
#[case(transport(None, "error sending request"), ErrorClass::Network)]
#[case(transport(Some(500), "status 500: upstream exploded"), ErrorClass::Network)]
#[case(transport(Some(401), "status 401: denied"), ErrorClass::Authentication)]
#[case(transport(Some(403), "status 403: denied"), ErrorClass::Authentication)]
#[case(protocol("Not allowed", Some("UNAUTHENTICATED")), ErrorClass::Authentication)]
#[case(protocol("Nope", Some("forbidden")), ErrorClass::Authentication)]
#[case(protocol("Invalid token supplied", None), ErrorClass::Authentication)]
#[case(protocol("Section title is required", Some("BAD_USER_INPUT")), ErrorClass::Operation)]
#[case(ServiceError::authentication_required("login first"), ErrorClass::Authentication)]
#[case(ServiceError::domain_failure("Course not found"), ErrorClass::Operation)]
#[case(ServiceError::validation("Quiz needs a title"), ErrorClass::Operation)]
#[case(GraphqlTransportError::empty_response("GetQuiz").into(), ErrorClass::Operation)]
#[case(
    CredentialStoreError::io("/home/ada/.lms: No space left on device").into(),
    ErrorClass::Operation
)]
#[case(
    CredentialStoreError::corrupt("/mnt/network-share/lms/session.json").into(),
    ErrorClass::Operation
)]
#[case(ServiceError::validation("Invalid token format"), ErrorClass::Operation)]
fn failures_are_classified_by_kind(#[case] cause: ServiceError, #[case] expected: ErrorClass) {
    assert_eq!(classify(cause, "load data").class(), expected);
}

#[test]
fn storage_failures_after_login_keep_their_own_message() {
    let cause: ServiceError = CredentialStoreError::io("No space left on device").into();
    let classified = classify(cause, "log in");
    assert!(!classified.requires_login());
    assert_eq!(
        classified.message(),
        "credential store I/O failed: No space left on device"
    );
}

#[rstest]
#[case(ServiceError::domain_failure("Network unreachable"))]
#[case(ServiceError::authentication_required("NETWORK down while checking token"))]
#[case(protocol("Unauthorized: network policy", Some("UNAUTHENTICATED")))]
#[case(transport(Some(401), "network error"))]
fn network_wording_always_wins(#[case] cause: ServiceError) {
    let classified = classify(cause, "save");
    assert_eq!(classified.class(), ErrorClass::Network);
    assert_eq!(classified.message(), NETWORK_MESSAGE);
}

#[test]
fn authentication_failures_prompt_a_fresh_login() {
    let classified = classify(transport(Some(401), "status 401: expired"), "load profile");
    assert!(classified.requires_login());
    assert_eq!(classified.to_string(), AUTHENTICATION_MESSAGE);
}

#[test]
fn operation_failures_keep_the_server_message() {
    let classified = classify(ServiceError::domain_failure("Course not found"), "create section");
    assert_eq!(classified.message(), "Course not found");
    assert_eq!(
        classified.cause(),
        &ServiceError::domain_failure("Course not found")
    );
}

#[rstest]
#[case(GraphqlTransportError::empty_response("CreateSection"))]
#[case(GraphqlTransportError::decode("missing field `success`"))]
#[case(GraphqlTransportError::invalid_request("document is empty"))]
fn unhelpful_failures_use_the_generic_fallback(#[case] cause: GraphqlTransportError) {
    let classified = classify(cause.into(), "create section");
    assert_eq!(classified.message(), "Failed to create section");
}

#[test]
fn blank_domain_messages_use_the_generic_fallback() {
    let classified = classify(ServiceError::domain_failure("  "), "delete quiz");
    assert_eq!(classified.message(), "Failed to delete quiz");
}

#[test]
fn source_exposes_the_unclassified_failure() {
    let classified = classify(transport(Some(500), "status 500: boom"), "upload file");
    let source = classified.source().expect("source present");
    assert_eq!(source.to_string(), "status 500: boom");
    assert!(matches!(
        classified.into_cause(),
        ServiceError::Transport(GraphqlTransportError::Transport {
            status: Some(500),
            ..
        })
    ));
}
