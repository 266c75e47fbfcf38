//! Shared test helpers

#![allow(dead_code)]

use acmedns_provider::Account;
use wiremock::MockServer;

/// Skip a test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_server {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: environment variable {} not set", $var);
                return;
            }
        )+
    };
}

/// Assert that a `Result` is `Ok` and unwrap it (failing the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Account registered at `server`, as acme-dns would hand it out.
pub fn test_account(server: &MockServer) -> Account {
    Account {
        full_domain: "d420c923-bbd7-4056-ab64-c3ca54c9b3cf.auth.example.org".to_string(),
        sub_domain: "d420c923-bbd7-4056-ab64-c3ca54c9b3cf".to_string(),
        username: "c36f50e8-4632-44f0-83fe-e070fef28a10".to_string(),
        password: "htB9mR9DYgcu9bX_afHF62erXaH2TS7bg9KW3F7Z".to_string(),
        server_url: server.uri(),
        allow_from: Vec::new(),
    }
}

/// A 43 character validation token.
pub const TEST_TOKEN: &str = "___validation_token_received_from_the_ca___";
