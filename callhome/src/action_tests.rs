//! Unit tests for the authentication action.

use super::*;
use crate::exchange::transport::MockTokenTransport;
use crate::exchange::{Endpoints, StepName, TokenExpiration, TransportError};
use crate::secret::{MockSecretStore, SecretHandle};
use rstest::{fixture, rstest};

#[fixture]
fn endpoints() -> Endpoints {
    Endpoints::from_domains(
        "https://id.example.test",
        "https://feeds.example.test",
        "https://feeds.example.test",
    )
}

fn answering(tokens: &'static [&'static str]) -> MockTokenTransport {
    let mut transport = MockTokenTransport::new();
    let mut seq = mockall::Sequence::new();
    for token in tokens {
        transport
            .expect_post_json()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(format!(r#"{{"Token":"{token}"}}"#)));
    }
    transport
}

fn action<'a>(transport: &'a MockTokenTransport, endpoints: &Endpoints) -> AuthenticationAction<'a> {
    AuthenticationAction::new(
        TokenExchange::new(transport, endpoints, TokenExpiration::from_secs(60)),
        Credentials::new("alice", "pw"),
    )
}

#[rstest]
fn succeeds_without_persistence(endpoints: Endpoints) {
    let transport = answering(&["A", "B", "C"]);

    let outcome = action(&transport, &endpoints).run();

    assert_eq!(outcome.upload_token().map(UploadToken::as_str), Some("C"));
    assert!(outcome.error().is_none());
    assert!(matches!(
        outcome,
        AuthenticationOutcome::Authenticated {
            persisted: false,
            ..
        }
    ));
}

#[rstest]
fn persists_token_into_pool_configuration(endpoints: Endpoints) {
    let transport = answering(&["A", "B", "C"]);
    let mut store = MockSecretStore::new();
    store
        .expect_create()
        .withf(|value| value == "C")
        .times(1)
        .returning(|_| Ok(SecretHandle::new("handle-1")));
    let mut pool = MockPoolConfig::new();
    pool.expect_health_check_config()
        .times(1)
        .returning(|| Ok(HealthCheckConfigMap::new()));
    pool.expect_set_health_check_config()
        .withf(|config| {
            config.get(UPLOAD_TOKEN_SECRET).map(String::as_str) == Some("handle-1")
                && config.len() == 1
        })
        .times(1)
        .returning(|_| Ok(()));

    let outcome = action(&transport, &endpoints)
        .save_token_as_secret(TokenPersistence {
            store: &store,
            pool: &pool,
        })
        .run();

    assert!(matches!(
        outcome,
        AuthenticationOutcome::Authenticated { persisted: true, .. }
    ));
}

#[rstest]
fn exchange_failure_leaves_pool_untouched(endpoints: Endpoints) {
    let mut transport = MockTokenTransport::new();
    let mut seq = mockall::Sequence::new();
    transport
        .expect_post_json()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(r#"{"Token":"A"}"#.to_owned()));
    transport
        .expect_post_json()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|url, _| {
            Err(TransportError::Status {
                url: url.to_owned(),
                code: 500,
            })
        });
    let mut store = MockSecretStore::new();
    store.expect_create().never();
    store.expect_update().never();
    let mut pool = MockPoolConfig::new();
    pool.expect_health_check_config().never();
    pool.expect_set_health_check_config().never();

    let outcome = action(&transport, &endpoints)
        .save_token_as_secret(TokenPersistence {
            store: &store,
            pool: &pool,
        })
        .run();

    assert!(outcome.upload_token().is_none());
    match outcome.error() {
        Some(ActionError::Exchange(err)) => assert_eq!(err.step(), StepName::Grant),
        other => panic!("expected exchange error, got {other:?}"),
    }
}

#[rstest]
fn empty_upload_token_keeps_existing_secret(endpoints: Endpoints) {
    let transport = answering(&["A", "B", ""]);
    let mut store = MockSecretStore::new();
    store.expect_create().never();
    store.expect_update().never();
    let mut pool = MockPoolConfig::new();
    pool.expect_health_check_config().never();
    pool.expect_set_health_check_config().never();

    let outcome = action(&transport, &endpoints)
        .save_token_as_secret(TokenPersistence {
            store: &store,
            pool: &pool,
        })
        .run();

    assert!(outcome.upload_token().is_none());
    assert_eq!(
        outcome.error(),
        Some(&ActionError::Exchange(ExchangeError::Serialization {
            step: StepName::Upload,
            reason: "empty token".to_owned(),
        }))
    );
}

#[rstest]
fn pool_write_failure_is_reported(endpoints: Endpoints) {
    let transport = answering(&["A", "B", "C"]);
    let mut store = MockSecretStore::new();
    store
        .expect_create()
        .returning(|_| Ok(SecretHandle::new("handle-1")));
    let mut pool = MockPoolConfig::new();
    pool.expect_health_check_config()
        .returning(|| Ok(HealthCheckConfigMap::new()));
    pool.expect_set_health_check_config().returning(|_| {
        Err(PoolConfigError {
            reason: "pool is read-only".to_owned(),
        })
    });

    let outcome = action(&transport, &endpoints)
        .save_token_as_secret(TokenPersistence {
            store: &store,
            pool: &pool,
        })
        .run();

    assert_eq!(
        outcome.error(),
        Some(&ActionError::PoolConfig(PoolConfigError {
            reason: "pool is read-only".to_owned(),
        }))
    );
}

#[rstest]
fn secret_failure_skips_pool_write(endpoints: Endpoints) {
    let transport = answering(&["A", "B", "C"]);
    let mut store = MockSecretStore::new();
    store.expect_create().returning(|_| {
        Err(SecretError::Transport {
            reason: "store offline".to_owned(),
        })
    });
    let mut pool = MockPoolConfig::new();
    pool.expect_health_check_config()
        .returning(|| Ok(HealthCheckConfigMap::new()));
    pool.expect_set_health_check_config().never();

    let outcome = action(&transport, &endpoints)
        .save_token_as_secret(TokenPersistence {
            store: &store,
            pool: &pool,
        })
        .run();

    assert!(matches!(outcome.error(), Some(ActionError::Secret(_))));
}

#[rstest]
fn cancelled_action_sends_no_requests(endpoints: Endpoints) {
    let mut transport = MockTokenTransport::new();
    transport.expect_post_json().never();
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let outcome = action(&transport, &endpoints)
        .with_cancellation(cancel)
        .run();

    assert_eq!(
        outcome.error(),
        Some(&ActionError::Exchange(ExchangeError::Cancelled {
            before: StepName::Identity
        }))
    );
}
