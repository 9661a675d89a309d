//! Resolver client against a local server that answers one request

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use musclemap::api::{ApiError, ResolverClient};
use musclemap::matrix::Matrix;
use musclemap::plan::{WorkoutPlan, NO_SIMILAR_EXERCISE};
use musclemap::scaler::ScaledVector;
use musclemap::session;
use musclemap::table::ExerciseTable;

struct Captured {
    request_line: String,
    body: Value,
}

/// Serve one canned response; the handle yields the request received
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        captured
    });

    (format!("http://{}", addr), handle)
}

async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }

    let text = String::from_utf8(buf).unwrap();
    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    Captured {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: serde_json::from_str(body).unwrap_or(Value::Null),
    }
}

fn table() -> ExerciseTable {
    ExerciseTable::parse(
        "Exercise,Chest,Abs\nPush Up,0.8,0.2\nCrunch,0,1\nDip,0.6,0\nPlank,0.1,0.7\n",
    )
    .unwrap()
}

#[tokio::test]
async fn test_generate_posts_demand_and_amount() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"T_pairs": [[1, 1], [0, 0], [1, 0]], "T_matrix": [[1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [0.0, 0.0]], "status": "Optimal"}"#,
    )
    .await;

    let client = ResolverClient::new(url);
    let demand = ScaledVector([0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    let response = client.generate(&demand, 3).await.unwrap();

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /api/gmra "));
    assert_eq!(captured.body, json!({ "L": [0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1], "amount": 3 }));

    let mut plan = WorkoutPlan::new();
    plan.apply_generated(response, &table());
    assert_eq!(plan.names(), &["Crunch", "Push Up"]);
}

#[tokio::test]
async fn test_error_status() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;

    let client = ResolverClient::new(url);
    let err = client.generate(&ScaledVector::default(), 1).await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, ApiError::Status { endpoint: "/api/gmra", status: 500 }));
}

#[tokio::test]
async fn test_shuffle_without_name_keeps_plan() {
    let (url, server) = serve_once("200 OK", r#"{"T_matrix": [[0, 1], [1, 1], [0, 0], [0, 0]]}"#).await;

    let mut plan = WorkoutPlan::new();
    plan.apply_generated(
        serde_json::from_value(json!({
            "T_pairs": [[1, 1], [0, 0]],
            "T_matrix": [[1, 0], [1, 1], [0, 0], [0, 0]]
        }))
        .unwrap(),
        &table(),
    );

    let client = ResolverClient::new(url);
    let name = plan.shuffle_target(0).unwrap().to_string();
    let response = client.shuffle(0, plan.matrix(), &name).await.unwrap();

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /api/shuffle "));
    assert_eq!(
        captured.body,
        json!({ "muscle_index": 0, "T_matrix": [[1, 0], [1, 1], [0, 0], [0, 0]], "muscle_name": "Crunch" })
    );

    plan.apply_shuffle(0, response);
    assert_eq!(plan.names(), &["Crunch", "Push Up"]);
    assert_eq!(plan.rows(), &[1, 0]);
    assert_eq!(plan.error(), Some(NO_SIMILAR_EXERCISE));
}

#[tokio::test]
async fn test_arrange_uses_spaced_out_order() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"balancedTmatrix": [[1, 1], [1, 0]], "reorderedIndices": [3, 1]}"#,
    )
    .await;

    let client = ResolverClient::new(url);
    let matrix = Matrix(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0], vec![1.0, 1.0]]);
    let workout = session::arrange(&client, &matrix, &CancellationToken::new())
        .await
        .unwrap();

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /api/spaceout "));
    assert_eq!(
        captured.body,
        json!({ "parsedTMatrix": [[1, 0], [1, 1]], "uniqueRowIndices": [1, 3] })
    );
    assert_eq!(workout.rows(), &[3, 1]);
}

#[tokio::test]
async fn test_arrange_falls_back_to_table_order() {
    let (url, server) = serve_once("503 Service Unavailable", "{}").await;

    let client = ResolverClient::new(url);
    let matrix = Matrix(vec![vec![0.0, 1.0], vec![0.0, 0.0], vec![1.0, 0.0]]);
    let workout = session::arrange(&client, &matrix, &CancellationToken::new())
        .await
        .unwrap();
    server.await.unwrap();

    assert_eq!(workout.rows(), &[0, 2]);
}

#[tokio::test]
async fn test_unreachable_resolver() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ResolverClient::new(format!("http://{}", addr));
    let err = client.generate(&ScaledVector::default(), 1).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { endpoint: "/api/gmra", .. }));
}
