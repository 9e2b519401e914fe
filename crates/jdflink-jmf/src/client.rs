// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blocking JMF client for a Caldera Nexio controller.
//
// One command per call: the envelope is serialized, POSTed once as
// `application/xml`, and the reply parsed and classified.  Nothing is
// retried and no state is kept between calls.

use std::io::Read;
use std::time::Duration;

use jdflink_core::ClientConfig;
use jdflink_core::node::{self, Node};
use tracing::{debug, info, instrument, warn};

use crate::command::Command;
use crate::error::{JOB_EXISTS_COMMENT, NexioError, Result};
use crate::message::JmfMessage;
use crate::params::{AbortQueueEntryParams, QueueSubmissionParams, RemoveQueueEntryParams};
use crate::response::JmfResponse;

/// Upper bound on a response body read from the controller.
const MAX_RESPONSE_BYTES: u64 = 16 * 1024 * 1024;

/// Moves a serialized envelope to the controller and returns the raw reply.
pub trait Transport {
    /// Deliver `body` and return the response body.  Network and HTTP-level
    /// failures are reported as [`NexioError::Communications`].
    fn send(&self, body: &[u8]) -> Result<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// HTTP transport
// ---------------------------------------------------------------------------

/// [`Transport`] over HTTP POST using a blocking `ureq` agent.
pub struct HttpTransport {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration, read_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .build();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.read_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn read_body(&self, response: ureq::Response) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        response
            .into_reader()
            .take(MAX_RESPONSE_BYTES + 1)
            .read_to_end(&mut buf)
            .map_err(|e| NexioError::Communications {
                message: format!("failed to read response from {}", self.endpoint),
                source: Some(Box::new(e)),
            })?;
        check_body_size(&buf, &self.endpoint)?;
        debug!(bytes = buf.len(), "response received");
        Ok(buf)
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, body), fields(endpoint = %self.endpoint, bytes = body.len()))]
    fn send(&self, body: &[u8]) -> Result<Vec<u8>> {
        let response = match self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/xml")
            .send_bytes(body)
        {
            Ok(response) => response,
            // Nexio may report a rejected command with an error status and a
            // JMF body; that body is still the answer.
            Err(ureq::Error::Status(code, response)) => {
                let status_text = response.status_text().to_owned();
                let reply = self.read_body(response)?;
                if is_jmf(&reply) {
                    debug!(status = code, "JMF reply carried an HTTP error status");
                    return Ok(reply);
                }
                return Err(NexioError::communications(format!(
                    "HTTP {code} {status_text} from Nexio at {}",
                    self.endpoint
                )));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(NexioError::Communications {
                    message: format!("failed to reach Nexio at {}", self.endpoint),
                    source: Some(Box::new(transport)),
                });
            }
        };
        self.read_body(response)
    }
}

fn check_body_size(body: &[u8], endpoint: &str) -> Result<()> {
    if body.len() as u64 > MAX_RESPONSE_BYTES {
        return Err(NexioError::communications(format!(
            "response from {endpoint} exceeds {} MiB",
            MAX_RESPONSE_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

fn is_jmf(body: &[u8]) -> bool {
    node::parse_root(body, "JMF").is_ok()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Sends queue commands to a Nexio controller.
pub struct NexioClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl NexioClient<HttpTransport> {
    /// A client speaking HTTP to the configured endpoint.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        config.validate().map_err(NexioError::Config)?;
        let transport = HttpTransport::from_config(&config);
        Ok(Self { config, transport })
    }
}

impl<T: Transport> NexioClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one envelope and return the controller's successful response.
    ///
    /// A non-success return code becomes [`NexioError::CommandFailed`], or
    /// [`NexioError::JobAlreadyExists`] for a duplicate submission.
    #[instrument(skip(self, message), fields(command = message.describe(), endpoint = %self.config.endpoint))]
    pub fn send(&self, message: &JmfMessage) -> Result<JmfResponse> {
        info!("sending command to Nexio");
        let body = message.to_xml_bytes().map_err(|e| NexioError::Communications {
            message: format!("failed to serialize {} envelope", message.describe()),
            source: Some(Box::new(e)),
        })?;

        let raw = self.transport.send(&body)?;
        debug!(body = %String::from_utf8_lossy(&raw), "raw response");

        let response = JmfResponse::from_bytes(&raw)?;
        classify_response(response)
    }

    /// Wrap `command` in an envelope from the configuration and send it.
    pub fn send_command(&self, command: Command) -> Result<JmfResponse> {
        self.send(&JmfMessage::from_config(&self.config, command))
    }

    pub fn submit(&self, params: QueueSubmissionParams) -> Result<JmfResponse> {
        self.send_command(Command::submit(params))
    }

    pub fn remove(&self, params: RemoveQueueEntryParams) -> Result<JmfResponse> {
        self.send_command(Command::remove(params))
    }

    pub fn abort(&self, params: AbortQueueEntryParams) -> Result<JmfResponse> {
        self.send_command(Command::abort(params))
    }
}

/// Pass successful responses through and turn failures into typed errors.
pub fn classify_response(response: JmfResponse) -> Result<JmfResponse> {
    let code = response.return_code();
    if code.is_success() {
        info!(ref_id = %response.response.ref_id, "command accepted");
        return Ok(response);
    }

    warn!(
        return_code = code.code(),
        message = code.message(),
        comment = response.notification_comment().unwrap_or_default(),
        "command rejected by Nexio"
    );
    if response.notification_comment() == Some(JOB_EXISTS_COMMENT) {
        Err(NexioError::JobAlreadyExists(Box::new(response)))
    } else {
        Err(NexioError::CommandFailed(Box::new(response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use std::net::{TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    use jdflink_core::JdfError;

    use crate::queue_filter::QueueFilter;
    use crate::return_code::ReturnCode;

    /// Replays a canned reply and records every request body.
    struct CannedTransport {
        reply: Option<Vec<u8>>,
        requests: RefCell<Vec<String>>,
    }

    impl CannedTransport {
        fn replying(xml: &str) -> Self {
            Self {
                reply: Some(xml.as_bytes().to_vec()),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        fn send(&self, body: &[u8]) -> Result<Vec<u8>> {
            self.requests
                .borrow_mut()
                .push(String::from_utf8_lossy(body).into_owned());
            self.reply
                .clone()
                .ok_or_else(|| NexioError::communications("connection refused"))
        }
    }

    fn reply(code: i64, comment: Option<&str>) -> String {
        let notification = comment
            .map(|c| format!(r#"<Notification Class="Error"><Comment>{c}</Comment></Notification>"#))
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<JMF xmlns="http://www.CIP4.org/JDFSchema_1_1" Version="1.4" SenderID="Nexio" TimeStamp="20231114T221320Z">
  <Response refID="C1" ID="R1" Type="SubmitQueueEntry" ReturnCode="{code}">{notification}</Response>
</JMF>"#
        )
    }

    fn client(transport: CannedTransport) -> NexioClient<CannedTransport> {
        let config = ClientConfig {
            sender_id: "press-1".into(),
            ..ClientConfig::default()
        };
        NexioClient::with_transport(config, transport)
    }

    #[test]
    fn success_is_returned() {
        let client = client(CannedTransport::replying(&reply(0, None)));
        let response = client.submit(QueueSubmissionParams::new("http://f/a.jdf")).unwrap();
        assert_eq!(response.return_code(), ReturnCode::SUCCESS);

        let requests = client.transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains(r#"SenderID="press-1""#));
        assert!(requests[0].contains(r#"Type="SubmitQueueEntry""#));
    }

    #[test]
    fn duplicate_job_is_classified() {
        let client = client(CannedTransport::replying(&reply(
            105,
            Some("Job with specified ID already exists"),
        )));
        let err = client.submit(QueueSubmissionParams::new("http://f/a.jdf")).unwrap_err();
        assert!(matches!(err, NexioError::JobAlreadyExists(_)));
        assert_eq!(err.response().unwrap().return_code(), ReturnCode::UNKNOWN_QUEUE_ENTRY);
        assert_eq!(err.notification_comment(), Some(JOB_EXISTS_COMMENT));
    }

    #[test]
    fn other_failures_are_command_failed() {
        let client = client(CannedTransport::replying(&reply(106, Some("Job is printing"))));
        let err = client
            .abort(AbortQueueEntryParams::new(
                crate::params::EndStatus::Aborted,
                QueueFilter::for_job("J1"),
            ))
            .unwrap_err();
        assert!(matches!(err, NexioError::CommandFailed(_)));
        assert_eq!(err.notification_comment(), Some("Job is printing"));
        assert!(err.to_string().contains("requested entry is running"));
    }

    #[test]
    fn failure_without_notification_is_command_failed() {
        let client = client(CannedTransport::replying(&reply(1, None)));
        let err = client
            .remove(RemoveQueueEntryParams::new(QueueFilter::for_job("J1")))
            .unwrap_err();
        assert!(matches!(err, NexioError::CommandFailed(_)));
        assert_eq!(err.notification_comment(), None);
    }

    #[test]
    fn malformed_reply_is_a_document_error() {
        let client = client(CannedTransport::replying("<JMF Version=\"1.4\""));
        let err = client.send_command(Command::remove_by_job_id("J1")).unwrap_err();
        assert!(matches!(err, NexioError::Document(JdfError::Xml(_))));
    }

    #[test]
    fn reply_without_response_is_a_document_error() {
        let client = client(CannedTransport::replying(
            r#"<JMF Version="1.4" SenderID="Nexio" TimeStamp="20231114T221320Z"/>"#,
        ));
        let err = client.send_command(Command::abort_by_job_id("J1")).unwrap_err();
        assert!(matches!(
            err,
            NexioError::Document(JdfError::MissingElement { ref tag, .. }) if tag == "Response"
        ));
    }

    #[test]
    fn transport_failures_propagate() {
        let client = client(CannedTransport::failing());
        let err = client.send_command(Command::remove_by_job_id("J1")).unwrap_err();
        assert!(matches!(err, NexioError::Communications { .. }));
        assert_eq!(client.transport.requests.borrow().len(), 1);
    }

    #[test]
    fn jmf_bodies_are_recognised() {
        assert!(is_jmf(reply(1, None).as_bytes()));
        assert!(!is_jmf(b"<html><body>502 Bad Gateway</body></html>"));
        assert!(!is_jmf(b"<html><body>expected <JMF> reply</body></html>"));
    }

    #[test]
    fn oversized_body_is_a_communications_failure() {
        let limit = MAX_RESPONSE_BYTES as usize;
        assert!(check_body_size(&vec![b' '; limit], "http://nexio").is_ok());
        let err = check_body_size(&vec![b' '; limit + 1], "http://nexio").unwrap_err();
        assert!(matches!(err, NexioError::Communications { .. }));
        assert!(err.to_string().contains("exceeds 16 MiB"));
    }

    // -- HTTP transport over loopback ----------------------------------------

    /// Answer one request on a loopback port with a canned HTTP response.
    /// The handle yields the raw request.
    fn serve_once(status: &str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let status = status.to_owned();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
            request
        });
        (format!("http://{addr}/jmf"), handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn http(endpoint: &str) -> HttpTransport {
        HttpTransport::new(endpoint, Duration::from_secs(2), Duration::from_secs(5))
    }

    #[test]
    fn http_posts_xml_and_returns_the_body() {
        let (endpoint, server) = serve_once("200 OK", reply(0, None));
        let body = http(&endpoint).send(b"<JMF/>").unwrap();
        assert!(is_jmf(&body));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /jmf"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/xml"));
        assert!(request.ends_with("<JMF/>"));
    }

    #[test]
    fn http_error_status_with_jmf_body_is_classified() {
        let (endpoint, server) = serve_once(
            "500 Internal Server Error",
            reply(105, Some(JOB_EXISTS_COMMENT)),
        );
        let config = ClientConfig {
            endpoint,
            ..ClientConfig::default()
        };
        let client = NexioClient::connect(config).unwrap();
        let err = client
            .submit(QueueSubmissionParams::new("http://f/a.jdf"))
            .unwrap_err();
        assert!(matches!(err, NexioError::JobAlreadyExists(_)));
        server.join().unwrap();
    }

    #[test]
    fn http_error_status_without_jmf_is_communications() {
        let (endpoint, server) = serve_once(
            "502 Bad Gateway",
            "<html><body>upstream said <JMF> was bad</body></html>".to_owned(),
        );
        let err = http(&endpoint).send(b"<JMF/>").unwrap_err();
        assert!(matches!(err, NexioError::Communications { source: None, .. }));
        assert!(err.to_string().contains("HTTP 502"));
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_communications_with_source() {
        let endpoint = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}/jmf", listener.local_addr().unwrap())
        };
        let err = http(&endpoint).send(b"<JMF/>").unwrap_err();
        assert!(matches!(err, NexioError::Communications { source: Some(_), .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn connect_rejects_invalid_config() {
        let config = ClientConfig {
            endpoint: "ftp://nexio".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            NexioClient::connect(config),
            Err(NexioError::Config(JdfError::Config(_)))
        ));

        let config = ClientConfig {
            sender_id: String::new(),
            ..ClientConfig::default()
        };
        let err = NexioClient::connect(config).err().unwrap();
        assert!(matches!(err, NexioError::Config(_)));
        assert!(!matches!(err, NexioError::Document(_)));
    }
}
