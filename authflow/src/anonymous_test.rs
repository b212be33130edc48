use futures::executor::block_on;

use super::*;
use crate::error::FormError;
use crate::test_helpers::{Call, ScriptedClient, anonymous_session, permanent_session};

fn rejected(message: &str) -> AuthFailure {
    AuthFailure::OperationFailed { message: message.to_owned(), code: None, status: Some(400) }
}

/// Observer already holding `session`, as after the first page load.
fn observer_with(client: &ScriptedClient) -> SessionObserver {
    let observer = SessionObserver::new();
    block_on(observer.refresh(client));
    observer
}

// =============================================================
// Transition table
// =============================================================

#[test]
fn permitted_commands_per_phase() {
    use SessionPhase::*;
    assert!(Command::SignInAnonymous.permitted_in(Unauthenticated));
    assert!(Command::SignInAnonymous.permitted_in(AuthenticatedAnonymous));
    assert!(!Command::SignInAnonymous.permitted_in(AuthenticatedPermanent));

    assert!(!Command::SignOut.permitted_in(Unauthenticated));
    assert!(Command::SignOut.permitted_in(AuthenticatedAnonymous));
    assert!(Command::SignOut.permitted_in(AuthenticatedPermanent));

    assert!(!Command::LinkAccount.permitted_in(Unauthenticated));
    assert!(Command::LinkAccount.permitted_in(AuthenticatedAnonymous));
    assert!(!Command::LinkAccount.permitted_in(AuthenticatedPermanent));
}

#[test]
fn link_form_shown_only_for_anonymous_sessions() {
    assert!(!AnonymousPanel::shows_link_form(SessionPhase::Unauthenticated));
    assert!(AnonymousPanel::shows_link_form(SessionPhase::AuthenticatedAnonymous));
    assert!(!AnonymousPanel::shows_link_form(SessionPhase::AuthenticatedPermanent));
}

#[test]
fn not_permitted_command_never_reaches_client() {
    let client = ScriptedClient::new();
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel::default();

    let err = block_on(panel.dispatch(Command::SignOut, &observer, &client)).unwrap_err();
    assert!(matches!(err, Rejection::NotPermitted { .. }));
    assert_eq!(client.calls(), vec![Call::GetSession]);
    assert!(!panel.is_busy());
}

#[test]
fn retry_button_hidden_once_session_is_permanent() {
    assert!(!AnonymousPanel::shows_retry(SessionPhase::Unauthenticated));
    assert!(AnonymousPanel::shows_retry(SessionPhase::AuthenticatedAnonymous));
    assert!(!AnonymousPanel::shows_retry(SessionPhase::AuthenticatedPermanent));
}

#[test]
fn refused_anonymous_sign_in_on_permanent_session_shows_error() {
    let mut panel = AnonymousPanel::default();

    let err = panel.begin(Command::SignInAnonymous, SessionPhase::AuthenticatedPermanent).unwrap_err();

    assert!(matches!(err, Rejection::NotPermitted { .. }));
    assert_eq!(panel.error, Some(err.to_string()));
    assert!(!panel.is_busy());
}

// =============================================================
// Busy guard
// =============================================================

#[test]
fn second_command_is_refused_while_first_is_in_flight() {
    let mut panel = AnonymousPanel::default();
    let pending = panel.begin(Command::SignInAnonymous, SessionPhase::Unauthenticated).expect("begin");
    assert_eq!(pending, Pending::SignInAnonymous);
    assert!(panel.is_busy());
    assert_eq!(panel.sign_in_label(SessionPhase::Unauthenticated), "Signing in...");

    let err = panel.begin(Command::SignInAnonymous, SessionPhase::Unauthenticated).unwrap_err();
    assert_eq!(err, Rejection::Busy);
}

#[test]
fn busy_clears_after_failure() {
    let mut panel = AnonymousPanel::default();
    panel.begin(Command::SignInAnonymous, SessionPhase::Unauthenticated).expect("begin");
    panel.complete(Completion {
        command: Command::SignInAnonymous,
        outcome: Err(AuthFailure::Unexpected("offline".to_owned())),
    });
    assert!(!panel.is_busy());
    assert_eq!(panel.sign_in_label(SessionPhase::Unauthenticated), "👻 Sign In Anonymously");
}

// =============================================================
// Anonymous sign-in
// =============================================================

#[test]
fn anonymous_sign_in_success_clears_error_and_shows_badge() {
    let client = ScriptedClient::new();
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel { error: Some("stale".to_owned()), ..AnonymousPanel::default() };
    client.push_session(Ok(anonymous_session("anon-1")));

    let settled = block_on(panel.dispatch(Command::SignInAnonymous, &observer, &client)).expect("dispatch");

    assert!(settled.refresh);
    assert_eq!(panel.error, None);
    assert!(panel.last_result.as_ref().is_some_and(OperationResult::is_success));
    let snapshot = observer.snapshot();
    assert_eq!(snapshot.phase(), SessionPhase::AuthenticatedAnonymous);
    let card = SessionCard::of(snapshot.session.as_ref().expect("session"));
    assert_eq!(card.badge(), Some("Anonymous"));
    assert_eq!(card.user_id, "anon-1");
}

#[test]
fn anonymous_sign_in_failure_stays_signed_out_with_error() {
    let client = ScriptedClient::new();
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel::default();
    client.push_session(Err(rejected("")));

    let settled = block_on(panel.dispatch(Command::SignInAnonymous, &observer, &client)).expect("dispatch");

    assert!(!settled.refresh);
    assert_eq!(panel.error.as_deref(), Some("Anonymous sign-in failed"));
    assert_eq!(
        panel.last_result,
        Some(OperationResult::Failure { error: ErrorBody { code: None, message: "Anonymous sign-in failed".to_owned() } })
    );
    assert_eq!(observer.snapshot().phase(), SessionPhase::Unauthenticated);
}

#[test]
fn try_again_replaces_anonymous_session() {
    let client = ScriptedClient::with_current(Some(anonymous_session("anon-1")));
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel::default();
    assert_eq!(panel.sign_in_label(SessionPhase::AuthenticatedAnonymous), "Try Again (new anonymous session)");
    client.push_session(Ok(anonymous_session("anon-2")));

    block_on(panel.dispatch(Command::SignInAnonymous, &observer, &client)).expect("dispatch");

    let snapshot = observer.snapshot();
    assert_eq!(snapshot.session.as_ref().map(|s| s.user.id.as_str()), Some("anon-2"));
    assert_eq!(snapshot.phase(), SessionPhase::AuthenticatedAnonymous);
}

// =============================================================
// Linking
// =============================================================

#[test]
fn short_password_is_rejected_without_calling_client() {
    let client = ScriptedClient::with_current(Some(anonymous_session("anon-1")));
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel::default();
    panel.link.email = "user@example.com".to_owned();
    panel.link.password = "short".to_owned();

    let err = block_on(panel.dispatch(Command::LinkAccount, &observer, &client)).unwrap_err();

    assert_eq!(err, Rejection::Invalid(FormError::PasswordTooShort { min: 8 }));
    assert_eq!(client.calls(), vec![Call::GetSession]);
    assert_eq!(panel.error.as_deref(), Some("Password must be at least 8 characters"));
    assert!(!panel.is_busy());
}

#[test]
fn implausible_email_is_rejected_without_calling_client() {
    let mut panel = AnonymousPanel::default();
    panel.link.email = "not-an-email".to_owned();
    panel.link.password = "password123".to_owned();

    let err = panel.begin(Command::LinkAccount, SessionPhase::AuthenticatedAnonymous).unwrap_err();
    assert_eq!(err, Rejection::Invalid(FormError::EmailInvalid));
}

#[test]
fn link_success_becomes_permanent_and_clears_form() {
    let client = ScriptedClient::with_current(Some(anonymous_session("anon-1")));
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel::default();
    panel.link.email = "user@example.com".to_owned();
    panel.link.password = "password123".to_owned();
    client.push_session(Ok(permanent_session("u2", "user@example.com")));

    block_on(panel.dispatch(Command::LinkAccount, &observer, &client)).expect("dispatch");

    let snapshot = observer.snapshot();
    assert_eq!(snapshot.phase(), SessionPhase::AuthenticatedPermanent);
    assert_eq!(snapshot.session.as_ref().map(|s| s.user.id.as_str()), Some("u2"));
    assert_eq!(panel.link, LinkRequest::default());
    assert_eq!(panel.error, None);
    assert!(!AnonymousPanel::shows_link_form(snapshot.phase()));
    assert_eq!(
        client.calls(),
        vec![
            Call::GetSession,
            Call::SignInEmail(Credentials {
                email: "user@example.com".to_owned(),
                password: "password123".to_owned()
            }),
            Call::GetSession,
        ]
    );
}

#[test]
fn link_failure_keeps_fields_and_anonymous_session() {
    let client = ScriptedClient::with_current(Some(anonymous_session("anon-1")));
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel::default();
    panel.link.email = "user@example.com".to_owned();
    panel.link.password = "password123".to_owned();
    client.push_session(Err(rejected("User already exists")));

    block_on(panel.dispatch(Command::LinkAccount, &observer, &client)).expect("dispatch");

    assert_eq!(panel.link.email, "user@example.com");
    assert_eq!(panel.link.password, "password123");
    assert_eq!(panel.error.as_deref(), Some("User already exists"));
    assert_eq!(observer.snapshot().phase(), SessionPhase::AuthenticatedAnonymous);
}

#[test]
fn link_success_survives_failed_refresh() {
    let client = ScriptedClient::with_current(Some(anonymous_session("anon-1")));
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel::default();
    panel.link.email = "user@example.com".to_owned();
    panel.link.password = "password123".to_owned();
    client.push_session(Ok(permanent_session("u2", "user@example.com")));
    client.fail_next_refresh(AuthFailure::Unexpected("offline".to_owned()));

    block_on(panel.dispatch(Command::LinkAccount, &observer, &client)).expect("dispatch");

    let snapshot = observer.snapshot();
    assert_eq!(snapshot.phase(), SessionPhase::AuthenticatedPermanent);
    assert_eq!(snapshot.last_refresh_error.as_deref(), Some("offline"));
    assert_eq!(panel.error, None);
}

#[test]
fn link_button_label_tracks_in_flight_link() {
    let mut panel = AnonymousPanel::default();
    panel.link.email = "user@example.com".to_owned();
    panel.link.password = "password123".to_owned();
    assert!(panel.can_submit_link());
    panel.begin(Command::LinkAccount, SessionPhase::AuthenticatedAnonymous).expect("begin");
    assert_eq!(panel.link_label(), "Linking...");
    assert!(!panel.can_submit_link());
}

// =============================================================
// Sign-out
// =============================================================

#[test]
fn sign_out_clears_result_and_error() {
    let client = ScriptedClient::with_current(Some(anonymous_session("anon-1")));
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel {
        error: Some("old".to_owned()),
        last_result: Some(OperationResult::Success { data: serde_json::json!({}) }),
        ..AnonymousPanel::default()
    };

    block_on(panel.dispatch(Command::SignOut, &observer, &client)).expect("dispatch");

    assert_eq!(panel.error, None);
    assert_eq!(panel.last_result, None);
    assert_eq!(observer.snapshot().phase(), SessionPhase::Unauthenticated);
}

#[test]
fn sign_out_from_permanent_session() {
    let client = ScriptedClient::with_current(Some(permanent_session("u2", "user@example.com")));
    let observer = observer_with(&client);
    let mut panel = AnonymousPanel::default();

    block_on(panel.dispatch(Command::SignOut, &observer, &client)).expect("dispatch");
    assert_eq!(observer.snapshot().phase(), SessionPhase::Unauthenticated);
}

#[test]
fn failed_sign_out_keeps_session_and_last_result() {
    let client = ScriptedClient::with_current(Some(anonymous_session("anon-1")));
    let observer = observer_with(&client);
    let previous = OperationResult::Success { data: serde_json::json!({ "user": { "id": "anon-1" } }) };
    let mut panel = AnonymousPanel { last_result: Some(previous.clone()), ..AnonymousPanel::default() };
    client.push_unit(Err(AuthFailure::Unexpected(String::new())));

    block_on(panel.dispatch(Command::SignOut, &observer, &client)).expect("dispatch");

    assert_eq!(panel.error.as_deref(), Some("Unknown error occurred"));
    assert_eq!(panel.last_result, Some(previous));
    assert_eq!(observer.snapshot().phase(), SessionPhase::AuthenticatedAnonymous);
}

// =============================================================
// Display helpers
// =============================================================

#[test]
fn session_card_falls_back_to_anonymous_user() {
    let mut session = anonymous_session("anon-1");
    session.user.name = None;
    let card = SessionCard::of(&session);
    assert_eq!(card.signed_in_as, "Anonymous User");
}

#[test]
fn permanent_card_has_no_badge() {
    let card = SessionCard::of(&permanent_session("u2", "user@example.com"));
    assert_eq!(card.signed_in_as, "user@example.com");
    assert_eq!(card.badge(), None);
}

#[test]
fn operation_result_serializes_like_service_response() {
    let ok = OperationResult::Success { data: serde_json::json!({ "id": 1 }) };
    assert_eq!(serde_json::to_value(&ok).expect("json"), serde_json::json!({ "data": { "id": 1 } }));
    let err = OperationResult::Failure { error: ErrorBody { code: None, message: "nope".to_owned() } };
    assert_eq!(serde_json::to_value(&err).expect("json"), serde_json::json!({ "error": { "message": "nope" } }));
    assert!(err.to_pretty_json().contains("\"message\": \"nope\""));
}
