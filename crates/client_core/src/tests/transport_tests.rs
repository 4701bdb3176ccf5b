use std::{io::Write, sync::Arc};

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use shared::{
    domain::{Operation, ParamField, ParamValues},
    params::OperationParams,
    protocol::ProcessForm,
};
use tokio::{net::TcpListener, sync::Mutex};
use url::Url;

use crate::{
    error::TransportError,
    transport::{resolve_url, HttpProcessClient, ProcessTransport, SelectedFile, Submission},
};

#[derive(Debug, Clone)]
struct ReceivedPart {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    received: Arc<Mutex<Vec<ReceivedPart>>>,
    status: StatusCode,
    body: &'static str,
}

async fn handle_process(
    State(state): State<MockState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    *state.received.lock().await = parts;

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

async fn serve_output() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], b"png-bytes".to_vec())
}

async fn spawn_process_server(
    status: StatusCode,
    body: &'static str,
) -> (String, Arc<Mutex<Vec<ReceivedPart>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        received: received.clone(),
        status,
        body,
    };
    let app = Router::new()
        .route("/api/process", post(handle_process))
        .route("/static/outputs/1_sharpen.png", get(serve_output))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), received)
}

fn sharpen_submission() -> Submission {
    let values = ParamValues::new()
        .with(ParamField::Amount, "1.5")
        .with(ParamField::Radius, "4")
        .with(ParamField::Factor, "ignored");
    let params = OperationParams::parse(Operation::Sharpen, &values).expect("valid");
    Submission {
        file: SelectedFile::from_bytes("cat.png", b"fake-png".to_vec()),
        form: ProcessForm::from_params(&params),
    }
}

const SUCCESS_BODY: &str = r#"{"ok":true,"meta":{"operation":"sharpen","amount":1.5,"radius":4},"input_url":"/static/uploads/1_cat.png","output_url":"/static/outputs/1_sharpen.png"}"#;

#[tokio::test]
async fn submit_sends_image_and_every_text_field() {
    let (server_url, received) = spawn_process_server(StatusCode::OK, SUCCESS_BODY).await;
    let client = HttpProcessClient::new(&server_url).expect("client");

    let response = client.submit(sharpen_submission()).await.expect("submit");

    assert!(response.ok);
    assert_eq!(
        response.output_url.as_deref(),
        Some("/static/outputs/1_sharpen.png")
    );

    let parts = received.lock().await.clone();
    let image = &parts[0];
    assert_eq!(image.name, "image");
    assert_eq!(image.file_name.as_deref(), Some("cat.png"));
    assert_eq!(image.content_type.as_deref(), Some("image/png"));
    assert_eq!(image.data, b"fake-png".to_vec());

    let text: Vec<(String, String)> = parts[1..]
        .iter()
        .map(|part| {
            (
                part.name.clone(),
                String::from_utf8(part.data.clone()).expect("utf8"),
            )
        })
        .collect();
    let expected: Vec<(String, String)> = [
        ("operation", "sharpen"),
        ("factor", ""),
        ("antialias", ""),
        ("scale", ""),
        ("method", ""),
        ("amount", "1.5"),
        ("radius", "4"),
        ("alpha", ""),
        ("beta", ""),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect();
    assert_eq!(text, expected);
}

#[tokio::test]
async fn submit_parses_failure_body_of_bad_request() {
    let (server_url, _) = spawn_process_server(
        StatusCode::BAD_REQUEST,
        r#"{"ok":false,"error":"unsupported format"}"#,
    )
    .await;
    let client = HttpProcessClient::new(&server_url).expect("client");

    let response = client.submit(sharpen_submission()).await.expect("submit");

    assert!(!response.ok);
    assert_eq!(response.error.as_deref(), Some("unsupported format"));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let (server_url, _) =
        spawn_process_server(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").await;
    let client = HttpProcessClient::new(&server_url).expect("client");

    let err = client.submit(sharpen_submission()).await.unwrap_err();

    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = HttpProcessClient::new(&format!("http://{addr}")).expect("client");

    let err = client.submit(sharpen_submission()).await.unwrap_err();

    assert!(matches!(err, TransportError::Http(_)));
}

#[tokio::test]
async fn custom_process_path_is_used() {
    let (server_url, _) = spawn_process_server(StatusCode::OK, SUCCESS_BODY).await;
    let client = HttpProcessClient::new(&server_url)
        .expect("client")
        .with_process_path("/v2/process");

    assert_eq!(
        client.endpoint().expect("endpoint").path(),
        "/v2/process"
    );
    // The mock only serves /api/process, so the 404 body is not JSON.
    let err = client.submit(sharpen_submission()).await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn fetch_preview_resolves_server_relative_urls() {
    let (server_url, _) = spawn_process_server(StatusCode::OK, SUCCESS_BODY).await;
    let client = HttpProcessClient::new(&server_url).expect("client");

    let bytes = client
        .fetch_preview("/static/outputs/1_sharpen.png")
        .await
        .expect("preview");
    assert_eq!(bytes, b"png-bytes".to_vec());

    let err = client
        .fetch_preview("/static/outputs/missing.png")
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
}

#[test]
fn resolve_url_joins_relative_and_keeps_absolute() {
    let base = Url::parse("http://127.0.0.1:5000/").expect("base");
    assert_eq!(
        resolve_url(&base, "/o/1.png").expect("join").as_str(),
        "http://127.0.0.1:5000/o/1.png"
    );
    assert_eq!(
        resolve_url(&base, "https://cdn.example.com/o/1.png")
            .expect("join")
            .as_str(),
        "https://cdn.example.com/o/1.png"
    );
}

#[test]
fn invalid_server_url_is_rejected() {
    let err = HttpProcessClient::new("not a url").err().expect("error");
    assert!(matches!(err, TransportError::Url { .. }));
}

#[tokio::test]
async fn selected_file_guesses_mime_from_extension() {
    let mut file = tempfile::Builder::new()
        .suffix(".jpg")
        .tempfile()
        .expect("tempfile");
    file.write_all(b"jpeg-bytes").expect("write");

    let selected = SelectedFile::from_path(file.path()).await.expect("read");

    assert!(selected.filename.ends_with(".jpg"));
    assert_eq!(selected.mime_type, "image/jpeg");
    assert_eq!(selected.bytes, b"jpeg-bytes".to_vec());

    let unknown = SelectedFile::from_bytes("blob", Vec::new());
    assert_eq!(unknown.mime_type, "application/octet-stream");
}
