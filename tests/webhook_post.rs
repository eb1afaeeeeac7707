use chrono::{TimeZone, Utc};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};

use rsvplog::{
    core::draft::Draft,
    entry::Entry,
    intake::{Intake, IntakeError, WebhookIntake},
    types::{DraftField, GuestField},
};

fn sample_entry() -> Entry {
    let mut draft = Draft::new();
    draft.set_field(DraftField::FullName("Alex Doe".to_string()));
    draft.set_field(DraftField::Email("alex@example.com".to_string()));
    draft.set_guest_field(0, GuestField::Name, "Sam");
    draft.set_guest_field(0, GuestField::Dietary, "vegan");
    draft
        .finalize_at(Utc.with_ymd_and_hms(2026, 1, 14, 18, 0, 0).unwrap(), "webhook-test")
        .expect("valid")
}

/// Serves one request with `status`, handing back the raw request text.
async fn one_shot_server(status: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let url = format!("http://{}/exec", listener.local_addr().expect("addr"));
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = sock.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let len = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length").then(|| v.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + len {
                    break;
                }
            }
        }
        let reply = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        sock.write_all(reply.as_bytes()).await.expect("write");
        let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
    });

    (url, rx)
}

#[tokio::test]
async fn posts_entry_json_as_plain_text() {
    let (url, rx) = one_shot_server("200 OK").await;
    let entry = sample_entry();

    WebhookIntake::new(url).submit(&entry).await.expect("submit");

    let request = rx.await.expect("request");
    let (head, body) = request.split_once("\r\n\r\n").expect("http request");
    assert!(head.starts_with("POST /exec HTTP/1.1"));
    assert!(head.to_ascii_lowercase().contains("content-type: text/plain"));

    let value: serde_json::Value = serde_json::from_str(body).expect("json body");
    assert_eq!(value["fullName"], "Alex Doe");
    assert_eq!(value["guests"][0]["dietary"], "vegan");
    assert_eq!(value["submittedAt"], "2026-01-14T18:00:00.000Z");
}

#[tokio::test]
async fn error_status_is_reported() {
    let (url, _rx) = one_shot_server("500 Internal Server Error").await;
    let err = WebhookIntake::new(url).submit(&sample_entry()).await.unwrap_err();
    assert!(matches!(err, IntakeError::Status(500)));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = WebhookIntake::new(format!("http://{addr}/exec"))
        .submit(&sample_entry())
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::Transport(_)));
}
