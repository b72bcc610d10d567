#[cfg(test)]
mod tests {
    use crate::utils::{drain_until_finished, ids};
    use connectors::elasticsearch::ElasticsearchClient;
    use engine_config::settings;
    use engine_processing::producer::SessionStatus;
    use engine_runtime::reader::{ScrollReader, options::ReaderOptions};
    use std::{io::Write, sync::Arc};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };
    use tracing_test::traced_test;

    const OPEN: &str = r#"{"_scroll_id":"ctx-1","took":3,"hits":{"total":{"value":3,"relation":"eq"},"hits":[
        {"_index":"activity","_type":"post","_id":"a","_score":null,"_source":{"verb":"post","lang":"en"}},
        {"_index":"activity","_type":"post","_id":"b","_score":null,"_source":{"verb":"share","lang":"de"}}]}}"#;
    const NEXT: &str = r#"{"_scroll_id":"ctx-2","hits":{"total":{"value":3,"relation":"eq"},"hits":[
        {"_index":"activity","_type":"post","_id":"c","_source":{"verb":"like","lang":"en"}}]}}"#;
    const EMPTY: &str = r#"{"_scroll_id":"ctx-2","hits":{"total":{"value":3,"relation":"eq"},"hits":[]}}"#;
    const CLEARED: &str = r#"{"succeeded":true,"num_freed":1}"#;

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                let content_length = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Fake cluster answering one canned response per connection.
    async fn fake_cluster(
        responses: Vec<(u16, &'static str)>,
    ) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);

                let response = format!(
                    "HTTP/1.1 {status} Status\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
            requests
        });

        (format!("http://{addr}"), handle)
    }

    fn settings_file(url: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let settings = serde_json::json!({
            "cluster": { "url": url, "username": "reader", "password": "secret", "request_timeout": "5s" },
            "query": {
                "indexes": ["activity"],
                "types": ["post"],
                "query": { "match_all": {} },
                "must_exist": ["lang"],
                "batch_size": 2,
                "scroll_timeout": "1m"
            },
            "session": { "buffer_capacity": 8, "shutdown_grace": "2s" }
        });
        write!(file, "{settings}").unwrap();
        file
    }

    // Scenario: settings file -> Elasticsearch client -> reader, against a fake cluster.
    // Expected Outcome: all three documents arrive in order, the scroll is
    // continued with the latest id and released at the end.
    #[traced_test]
    #[tokio::test]
    async fn reads_through_elasticsearch_client() {
        let (url, server) =
            fake_cluster(vec![(200, OPEN), (200, NEXT), (200, EMPTY), (200, CLEARED)]).await;
        let file = settings_file(&url);

        let settings = settings::load(file.path()).unwrap();
        let client = ElasticsearchClient::new(settings.cluster.clone()).unwrap();
        let reader = ScrollReader::new(Arc::new(client))
            .with_options(ReaderOptions::from_settings(&settings.session));

        reader.start(settings.spec.clone()).unwrap();
        let records = drain_until_finished(&reader).await;

        assert_eq!(ids(&records), vec!["a", "b", "c"]);
        assert_eq!(records[1].get("verb"), Some(&serde_json::json!("share")));
        assert_eq!(reader.status(), SessionStatus::Exhausted);
        assert_eq!(reader.hits_reported(), 3);

        let progress = reader.progress();
        assert_eq!(progress.remaining(), 0);
        assert_eq!(progress.read_percent(), 1.0);

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /activity/post/_search?scroll=1m "));
        assert!(requests[0].contains(r#""exists":{"field":"lang"}"#));
        assert!(requests[0].to_lowercase().contains("authorization: basic"));
        assert!(requests[1].starts_with("POST /_search/scroll "));
        assert!(requests[1].contains(r#""scroll_id":"ctx-1""#));
        assert!(requests[2].contains(r#""scroll_id":"ctx-2""#));
        assert!(requests[3].starts_with("DELETE /_search/scroll "));
        assert!(logs_contain("Fetch worker finished."));
    }

    // Scenario: the cluster rejects the search.
    // Expected Outcome: the session fails with the cluster's status and nothing is drained.
    #[tokio::test]
    async fn rejected_search_fails_the_session() {
        let (url, server) = fake_cluster(vec![(
            400,
            r#"{"error":{"type":"index_not_found_exception"},"status":400}"#,
        )])
        .await;
        let file = settings_file(&url);

        let settings = settings::load(file.path()).unwrap();
        let client = ElasticsearchClient::new(settings.cluster.clone()).unwrap();
        let reader = ScrollReader::new(Arc::new(client));

        reader.start(settings.spec.clone()).unwrap();
        let status = reader.wait_finished().await.unwrap();

        assert!(status.is_failed());
        assert!(reader.failure().unwrap().contains("400"));
        assert!(reader.drain().unwrap().is_empty());
        server.await.unwrap();
    }
}
