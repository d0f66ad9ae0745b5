use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

use crate::error::{InsightsError, InsightsResult};

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Process-wide blocking client. The timeout of the first caller wins.
pub fn http_client(timeout: Duration) -> InsightsResult<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pitchside/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| InsightsError::Network(format!("failed to build http client: {err}")))
    })
}
