//! Sending submission records to the results form

use crate::error::{Result, TrackerError};
use crate::submission::SubmissionRecord;
use std::time::Duration;
use url::Url;

/// Something that can deliver a result record
pub trait ResultTransport {
    fn send(&mut self, record: &SubmissionRecord) -> Result<()>;
}

impl<T: ResultTransport + ?Sized> ResultTransport for Box<T> {
    fn send(&mut self, record: &SubmissionRecord) -> Result<()> {
        (**self).send(record)
    }
}

/// Posts records as `application/x-www-form-urlencoded` to a form endpoint
pub struct FormTransport {
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl FormTransport {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            // A redirect means the form did not take the response
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .user_agent(concat!("spikeball-rounds/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                TrackerError::Transport(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { endpoint, client })
    }
}

impl ResultTransport for FormTransport {
    fn send(&mut self, record: &SubmissionRecord) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint.as_str())
            .form(record)
            .send()
            .map_err(|e| TrackerError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Transport(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        Ok(())
    }
}

/// Logs records instead of sending them, for rehearsals without a live form
#[derive(Debug, Default)]
pub struct DryRunTransport {
    sent: usize,
}

impl DryRunTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl ResultTransport for DryRunTransport {
    fn send(&mut self, record: &SubmissionRecord) -> Result<()> {
        log::info!("Dry run, not sending: {:?}", record);
        self.sent += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Round, UserId};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// What the one-shot server saw: request head and body
    struct Captured {
        head: String,
        body: String,
    }

    /// Accept a single request, answer it with `status_line` and hand back what was sent
    fn serve_once(status_line: &'static str) -> (Url, thread::JoinHandle<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let captured = loop {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                let end = match text.find("\r\n\r\n") {
                    Some(end) => end,
                    None if n == 0 => panic!("connection closed before headers"),
                    None => continue,
                };
                let head = text[..end].to_string();
                let length = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    let body = text[end + 4..end + 4 + length].to_string();
                    break Captured { head, body };
                }
                assert!(n > 0, "connection closed before body");
            };

            let response = format!(
                "{}\r\nLocation: http://{}/elsewhere\r\n{}",
                status_line, addr, "Content-Length: 0\r\nConnection: close\r\n\r\n"
            );
            stream.write_all(response.as_bytes()).unwrap();
            captured
        });

        let endpoint = Url::parse(&format!("http://{}/formResponse", addr)).unwrap();
        (endpoint, handle)
    }

    fn round_three_record() -> SubmissionRecord {
        let round = Round::new(3, 2, [UserId(1), UserId(2), UserId(3), UserId(4)]);
        SubmissionRecord::new(&round, [1, 0, 1], UserId(2))
    }

    fn send_to(status_line: &'static str) -> (Result<()>, Captured) {
        let (endpoint, server) = serve_once(status_line);
        let mut transport = FormTransport::new(endpoint, Duration::from_secs(5)).unwrap();
        let result = transport.send(&round_three_record());
        (result, server.join().unwrap())
    }

    #[test]
    fn test_dry_run_counts_records() {
        let round = Round::new(2, 1, [UserId(1), UserId(3), UserId(2), UserId(4)]);
        let record = SubmissionRecord::new(&round, [0, 1, 1], UserId(3));

        let mut transport: Box<dyn ResultTransport> = Box::new(DryRunTransport::new());
        assert!(transport.send(&record).is_ok());

        let mut dry = DryRunTransport::new();
        dry.send(&record).unwrap();
        dry.send(&record).unwrap();
        assert_eq!(dry.sent(), 2);
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        // Nothing listens on the discard port
        let endpoint = Url::parse("http://127.0.0.1:9/formResponse").unwrap();
        let mut transport = FormTransport::new(endpoint, Duration::from_secs(2)).unwrap();
        let round = Round::new(1, 1, [UserId(1), UserId(2), UserId(3), UserId(4)]);
        let record = SubmissionRecord::new(&round, [1, 1, 1], UserId(1));

        assert!(matches!(transport.send(&record), Err(TrackerError::Transport(_))));
    }

    #[test]
    fn test_form_post_success() {
        let (result, captured) = send_to("HTTP/1.1 200 OK");
        assert!(result.is_ok());
        assert!(captured.head.starts_with("POST /formResponse "));
        assert!(captured
            .head
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert_eq!(
            captured.body,
            "round=3&net=2&id1=1&id2=2&id3=3&id4=4&match1=1&match2=0&match3=1&submitted_by=2"
        );
    }

    #[test]
    fn test_redirect_is_a_failure() {
        let (result, captured) = send_to("HTTP/1.1 302 Found");
        match result {
            Err(TrackerError::Transport(msg)) => assert!(msg.contains("302"), "{}", msg),
            other => panic!("expected transport error, got {:?}", other),
        }
        assert!(captured.body.starts_with("round=3&"));
    }

    #[test]
    fn test_server_error_is_a_failure() {
        let (result, _) = send_to("HTTP/1.1 500 Internal Server Error");
        match result {
            Err(TrackerError::Transport(msg)) => assert!(msg.contains("500"), "{}", msg),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
