//! Test helpers for the Mode API

use super::client::{Client, ClientConfig, RetryConfig};
use super::deletion::DeletionConfig;
use super::transport::Credentials;
use std::time::Duration;

pub const TEST_WORKSPACE: &str = "ws1";

/// Millisecond-scale retry and polling so timing paths run quickly
pub fn fast_config() -> ClientConfig {
    ClientConfig {
        retry: RetryConfig {
            max_attempts: 9,
            backoff: Duration::from_millis(10),
        },
        deletion: DeletionConfig {
            tick: Duration::from_millis(20),
            timeout: Duration::from_millis(300),
        },
        ..ClientConfig::default()
    }
}

pub fn create_test_client(url: &str) -> Client {
    Client::with_config(
        url,
        TEST_WORKSPACE,
        Credentials::new("token", "secret"),
        fast_config(),
    )
    .unwrap()
}

pub fn create_test_client_with_retry(url: &str, retry: RetryConfig) -> Client {
    Client::with_config(
        url,
        TEST_WORKSPACE,
        Credentials::new("token", "secret"),
        ClientConfig {
            retry,
            ..fast_config()
        },
    )
    .unwrap()
}

pub fn create_test_client_with_deletion(url: &str, deletion: DeletionConfig) -> Client {
    Client::with_config(
        url,
        TEST_WORKSPACE,
        Credentials::new("token", "secret"),
        ClientConfig {
            deletion,
            ..fast_config()
        },
    )
    .unwrap()
}
