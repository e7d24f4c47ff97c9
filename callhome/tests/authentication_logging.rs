//! Log output of the authentication action.
//!
//! `logtest` installs a process-wide logger, so every check lives in one
//! test.

use healthcheck_callhome::action::{AuthenticationAction, TokenPersistence};
use healthcheck_callhome::exchange::{Credentials, Endpoints, TokenExchange, TokenExpiration};
use healthcheck_callhome::secret::{HealthCheckConfigMap, UPLOAD_TOKEN_SECRET};
use healthcheck_callhome::test_utils::{InMemoryPoolConfig, InMemorySecretStore, StubTransport};
use log::Level;
use logtest::{Logger, Record};

fn drain(logger: &mut Logger) -> Vec<Record> {
    std::iter::from_fn(|| logger.pop()).collect()
}

fn authenticate(transport: &StubTransport, persistence: Option<TokenPersistence<'_>>) {
    let endpoints = Endpoints::from_domains(
        "https://id.example.test",
        "https://feeds.example.test",
        "https://feeds.example.test",
    );
    let exchange = TokenExchange::new(transport, &endpoints, TokenExpiration::from_secs(60));
    let mut action = AuthenticationAction::new(exchange, Credentials::new("alice", "hunter2"));
    if let Some(persistence) = persistence {
        action = action.save_token_as_secret(persistence);
    }
    let _outcome = action.run();
}

#[test]
fn authentication_logs_progress_and_failures_without_secrets() {
    let mut logger = Logger::start();

    // A failed exchange is reported at error level, naming the step.
    let failing = StubTransport::new();
    failing.respond_with_token("identity-token-value");
    failing.fail_with_status(401);
    authenticate(&failing, None);

    let failure_records = drain(&mut logger);
    let errors: Vec<String> = failure_records
        .iter()
        .filter(|record| record.level() == Level::Error)
        .map(|record| record.args().to_string())
        .collect();
    assert_eq!(errors.len(), 1, "got {errors:?}");
    assert!(errors.iter().all(|message| message.contains("grant")));
    assert!(
        errors
            .iter()
            .all(|message| message.starts_with("authentication failed")),
        "got {errors:?}"
    );
    assert!(
        failure_records
            .iter()
            .filter(|record| record.level() == Level::Debug)
            .any(|record| record.args().to_string().contains("requesting identity token")),
        "each step should be traced at debug level"
    );

    // A stale handle falls back to a new secret with a warning.
    let succeeding = StubTransport::new();
    succeeding.respond_with_token("identity-token-value");
    succeeding.respond_with_token("grant-token-value");
    succeeding.respond_with_token("upload-token-value");
    let store = InMemorySecretStore::new();
    let mut config = HealthCheckConfigMap::new();
    config.insert(UPLOAD_TOKEN_SECRET.to_owned(), "secret-gone".to_owned());
    let pool = InMemoryPoolConfig::with_config(config);
    authenticate(
        &succeeding,
        Some(TokenPersistence {
            store: &store,
            pool: &pool,
        }),
    );

    let records = drain(&mut logger);
    assert!(
        records
            .iter()
            .any(|record| record.level() == Level::Warn
                && record.args().to_string().contains("no longer exists")),
        "fallback to create should be logged as a warning"
    );
    assert!(
        records
            .iter()
            .any(|record| record.level() == Level::Info
                && record.args().to_string().contains("created secret")),
    );
    assert!(records.iter().all(|record| record.level() != Level::Error));

    // No token or password value ever reaches the log.
    for record in failure_records.iter().chain(&records) {
        let message = record.args().to_string();
        for secret in [
            "hunter2",
            "identity-token-value",
            "grant-token-value",
            "upload-token-value",
        ] {
            assert!(!message.contains(secret), "leaked {secret}: {message}");
        }
    }
}
