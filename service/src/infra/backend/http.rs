//! HTTP [`Backend`] implementation.

use std::time::Duration;

use common::operations::Select;
use tracerr::Traced;
use tracing as log;

use super::{Backend, Envelope, Error, Request};

/// [`Backend`] reached over HTTP with JSON bodies.
#[derive(Clone, Debug)]
pub struct Http {
    /// Client performing the requests.
    client: reqwest::Client,

    /// URL of the course list endpoint.
    url: String,
}

impl Http {
    /// Creates a new [`Http`] backend posting to the provided `url`, with
    /// every request limited by the provided `timeout`.
    ///
    /// # Errors
    ///
    /// If failed to build an HTTP client.
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, Traced<Error>> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| tracerr::new!(Error::Transport(e.to_string())))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl Backend<Select<Request>> for Http {
    type Ok = Envelope;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(request): Select<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!(
            page = request.page,
            order_by = request.order_by,
            "requesting courses from `{}`",
            self.url
        );

        let resp = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| tracerr::new!(Error::Transport(e.to_string())))?;

        let status = resp.status();
        if !status.is_success() {
            log::warn!(%status, "backend responded with failure status");
            return Err(tracerr::new!(Error::Status(status.as_u16())));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| tracerr::new!(Error::Transport(e.to_string())))?;
        serde_json::from_slice(&body)
            .map_err(|e| tracerr::new!(Error::Decode(e.to_string())))
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::Select;
    use tokio::{
        io::{AsyncReadExt as _, AsyncWriteExt as _},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::{Backend as _, Error, Http, Request};
    use crate::infra::backend::Filters;

    fn request() -> Request {
        Request {
            filters: Filters {
                active: true,
                ..Filters::default()
            },
            order_by: "subscribers_count",
            order_by_direction: "desc",
            per_page: 12,
            paginate: true,
            page: 1,
        }
    }

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len(),
        )
    }

    /// Indicates whether the provided bytes hold a whole HTTP request.
    fn is_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let len = head
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= len
    }

    /// Serves a single request with the provided raw `response`, returning
    /// the URL to request and the received raw request.
    async fn serve(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/courses", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0_u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if n == 0 || is_complete(&buf) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        });
        (url, handle)
    }

    fn http(url: &str) -> Http {
        Http::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn posts_request_and_decodes_envelope() {
        let body = r#"{"result":"Success","data":[{"id":1}],"status":200}"#;
        let (url, server) = serve(response("200 OK", body)).await;

        let envelope = http(&url).execute(Select(request())).await.unwrap();
        let received = server.await.unwrap();

        assert!(received.starts_with("POST /api/courses "));
        assert!(received.contains(r#""orderBy":"subscribers_count""#));
        assert!(received.contains(r#""page":1"#));
        assert_eq!(envelope.status, Some(200));
        assert_eq!(envelope.into_page().unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn failure_status_is_error() {
        let (url, server) =
            serve(response("500 Internal Server Error", "")).await;

        let err = http(&url).execute(Select(request())).await.unwrap_err();
        _ = server.await.unwrap();

        assert_eq!(err.into_inner(), Error::Status(500));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (url, server) = serve(response("200 OK", "not json!")).await;

        let err = http(&url).execute(Select(request())).await.unwrap_err();
        _ = server.await.unwrap();

        assert!(matches!(err.into_inner(), Error::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/courses", listener.local_addr().unwrap());
        drop(listener);

        let err = http(&url).execute(Select(request())).await.unwrap_err();

        assert!(matches!(err.into_inner(), Error::Transport(_)));
    }
}
