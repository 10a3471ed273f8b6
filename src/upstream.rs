use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};

/// Builds the HTTP client used for outbound calls to a single upstream service.
pub fn http_client(timeout_in_seconds: u64) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_in_seconds))
        .build()
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

/// Sends the request, retrying once if the first attempt fails with a connect or timeout error.
pub async fn send_with_single_retry(request: RequestBuilder) -> reqwest::Result<Response> {
    let retry = request.try_clone();

    match request.send().await {
        Ok(response) => Ok(response),
        Err(err) if is_transient(&err) => match retry {
            Some(retry) => {
                tracing::warn!(err = %err.without_url(), "Transient upstream failure, retrying once");

                retry.send().await
            }
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    #[tokio::test]
    async fn timed_out_request_is_sent_twice() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200).delay(Duration::from_millis(1500));
            })
            .await;

        let client = http_client(1).unwrap();
        let err = send_with_single_retry(client.get(server.url("/slow")))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn successful_request_is_sent_once() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/fast");
                then.status(204);
            })
            .await;

        let client = http_client(5).unwrap();
        let response = send_with_single_retry(client.get(server.url("/fast")))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 204);
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn error_status_is_not_retried() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/broken");
                then.status(500);
            })
            .await;

        let client = http_client(5).unwrap();
        let response = send_with_single_retry(client.get(server.url("/broken")))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 500);
        mock.assert_hits_async(1).await;
    }
}
