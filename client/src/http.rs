use std::time::{Duration, Instant};

use gust_instruments::{OperationRecord, Reporter};
use serde::Serialize;

use crate::graphql::GraphqlRequest;

/// A completed HTTP exchange. The status is data, not a failure signal, so callers decide for
/// themselves what a non-2xx response means for their checks.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn is_status(&self, status: u16) -> bool {
        self.status == status
    }
}

/// Only connection-level faults surface as errors from the client, everything that produced a
/// status line is a valid [HttpResponse].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport failure during {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A JSON POST client that reports the duration of every call it makes.
///
/// Cheap to clone, the underlying connection pool is shared between clones so virtual users
/// reuse connections instead of opening one per iteration.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    reporter: Reporter,
}

impl HttpClient {
    /// The timeout bounds each request end-to-end, including reading the body. It is the only
    /// limit on a hung call.
    pub fn new(reporter: Reporter, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self { inner, reporter })
    }

    /// POST `body` as JSON and wait for the full response body.
    ///
    /// One operation record named `operation` is reported per call, marked as an error only
    /// for transport faults.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        url: &str,
        body: &B,
    ) -> Result<HttpResponse, ClientError> {
        let record = OperationRecord::new(operation);
        let started = Instant::now();

        let response = match self.inner.post(url).json(body).send().await {
            Ok(response) => response,
            Err(source) => {
                log::debug!("Transport failure during {operation}: {source}");
                self.reporter.add_operation(record.finish(true));
                return Err(ClientError::Transport {
                    operation: operation.to_string(),
                    source,
                });
            }
        };

        let status = response.status().as_u16();
        // The connection can still drop while the body streams in, which is a transport
        // fault too.
        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => {
                log::debug!("Failed reading response body during {operation}: {source}");
                self.reporter.add_operation(record.finish(true));
                return Err(ClientError::Transport {
                    operation: operation.to_string(),
                    source,
                });
            }
        };

        self.reporter.add_operation(record.finish(false));
        Ok(HttpResponse {
            status,
            body,
            elapsed: started.elapsed(),
        })
    }

    /// POST a GraphQL document with its variables as the standard `{query, variables}`
    /// envelope. The response is returned untouched, interpreting `data` and `errors` is the
    /// caller's job.
    pub async fn graphql(
        &self,
        operation: &str,
        endpoint: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<HttpResponse, ClientError> {
        self.post(operation, endpoint, &GraphqlRequest { query, variables })
            .await
    }
}
