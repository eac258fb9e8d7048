//! Guard for archiver tests that stand up wiremock VK / Yandex Disk servers.
//!
//! Sandboxed CI runners sometimes forbid binding localhost sockets. Those
//! tests then skip with a note on stderr, unless
//! `PHOTO_ARCHIVER_REQUIRE_SOCKET_TESTS` asks for a hard failure.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "PHOTO_ARCHIVER_REQUIRE_SOCKET_TESTS";

/// What a socket-bound test should do in the current environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockApiAvailability {
    /// A localhost socket can be bound; run the test.
    Run,
    /// No socket, and skipping is allowed.
    Skip,
    /// No socket, but the environment requires these tests.
    Fail,
}

#[must_use]
pub fn mock_api_availability(can_bind: bool, required: bool) -> MockApiAvailability {
    match (can_bind, required) {
        (true, _) => MockApiAvailability::Run,
        (false, false) => MockApiAvailability::Skip,
        (false, true) => MockApiAvailability::Fail,
    }
}

#[must_use]
pub fn parse_required_flag(value: Option<&str>) -> bool {
    value.is_some_and(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[track_caller]
#[must_use]
pub fn should_skip_socket_bound_test() -> bool {
    let can_bind = TcpListener::bind("127.0.0.1:0").is_ok();
    let required = parse_required_flag(std::env::var(REQUIRE_ENV).ok().as_deref());
    let location = Location::caller();

    match mock_api_availability(can_bind, required) {
        MockApiAvailability::Run => false,
        MockApiAvailability::Skip => {
            eprintln!(
                "[photo-archiver] {}:{}: no localhost socket for the mock VK/Yandex API; skipping (set {REQUIRE_ENV}=1 to fail instead)",
                location.file(),
                location.line()
            );
            true
        }
        MockApiAvailability::Fail => panic!(
            "[photo-archiver] {}:{}: no localhost socket for the mock VK/Yandex API and {REQUIRE_ENV} is set",
            location.file(),
            location.line()
        ),
    }
}

pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if should_skip_socket_bound_test() {
        None
    } else {
        Some(MockServer::start().await)
    }
}

#[test]
fn test_mock_api_availability_decisions() {
    assert_eq!(mock_api_availability(true, false), MockApiAvailability::Run);
    assert_eq!(mock_api_availability(true, true), MockApiAvailability::Run);
    assert_eq!(mock_api_availability(false, false), MockApiAvailability::Skip);
    assert_eq!(mock_api_availability(false, true), MockApiAvailability::Fail);
}

#[test]
fn test_parse_required_flag_values() {
    assert!(parse_required_flag(Some("1")));
    assert!(parse_required_flag(Some(" TRUE ")));
    assert!(parse_required_flag(Some("yes")));
    assert!(!parse_required_flag(Some("0")));
    assert!(!parse_required_flag(Some("")));
    assert!(!parse_required_flag(None));
}
