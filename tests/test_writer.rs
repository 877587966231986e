use httpfromtcp::http::chunked::decode_chunked;
use httpfromtcp::http::headers::Headers;
use httpfromtcp::http::response::{StatusCode, default_headers};
use httpfromtcp::http::writer::ResponseWriter;

fn split_head(raw: &[u8]) -> (String, &[u8]) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header block");
    (String::from_utf8_lossy(&raw[..end + 4]).into_owned(), &raw[end + 4..])
}

#[tokio::test]
async fn test_write_status_line_known_codes() {
    let cases = [
        (StatusCode::OK, "HTTP/1.1 200 OK\r\n"),
        (StatusCode::BAD_REQUEST, "HTTP/1.1 400 Bad Request\r\n"),
        (StatusCode::INTERNAL_SERVER_ERROR, "HTTP/1.1 500 Internal Server Error\r\n"),
        (StatusCode(503), "HTTP/1.1 503 \r\n"),
    ];

    for (status, expected) in cases {
        let mut w = ResponseWriter::new(Vec::new());
        w.write_status_line(status).await.unwrap();
        assert_eq!(String::from_utf8(w.into_inner()).unwrap(), expected);
    }
}

#[tokio::test]
async fn test_write_fixed_response() {
    let body = b"Hello World!\n";
    let mut w = ResponseWriter::new(Vec::new());
    w.write_status_line(StatusCode::OK).await.unwrap();
    w.write_headers(&default_headers(body.len())).await.unwrap();
    w.write_body(body).await.unwrap();

    let raw = w.into_inner();
    let (head, rest) = split_head(&raw);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Length: 13\r\n"));
    assert!(head.contains("Connection: closed\r\n"));
    assert!(head.contains("Content-Type: text/plain\r\n"));
    assert_eq!(head.matches("\r\n").count(), 5);
    assert_eq!(rest, body);
}

#[tokio::test]
async fn test_write_empty_header_block() {
    let mut w = ResponseWriter::new(Vec::new());
    w.write_headers(&Headers::new()).await.unwrap();
    assert_eq!(w.into_inner(), b"\r\n");
}

#[tokio::test]
async fn test_chunk_framing_uses_uppercase_hex() {
    let mut w = ResponseWriter::new(Vec::new());
    w.write_chunked_body(&[b'x'; 26]).await.unwrap();
    w.write_chunked_body(b"abc").await.unwrap();
    w.write_chunked_body(b"").await.unwrap();
    w.write_chunked_body_done().await.unwrap();

    let mut expected = b"1A\r\n".to_vec();
    expected.extend_from_slice(&[b'x'; 26]);
    expected.extend_from_slice(b"\r\n3\r\nabc\r\n0\r\n\r\n");
    assert_eq!(w.into_inner(), expected);
}

#[tokio::test]
async fn test_chunked_round_trip() {
    let pieces: Vec<Vec<u8>> = vec![
        b"first".to_vec(),
        vec![0u8; 1024],
        b"\r\n0\r\n\r\n".to_vec(),
        (0..=255u8).collect(),
        b"z".to_vec(),
    ];

    let mut w = ResponseWriter::new(Vec::new());
    for piece in &pieces {
        w.write_chunked_body(piece).await.unwrap();
    }
    w.write_chunked_body_done().await.unwrap();

    let (body, trailers) = decode_chunked(&w.into_inner()).unwrap();
    assert_eq!(body, pieces.concat());
    assert!(trailers.is_empty());
}

#[tokio::test]
async fn test_chunked_response_with_trailers() {
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-Length");

    let mut w = ResponseWriter::new(Vec::new());
    w.write_status_line(StatusCode::OK).await.unwrap();
    w.write_headers(&headers).await.unwrap();
    w.write_chunked_body(b"hello ").await.unwrap();
    w.write_chunked_body(b"world").await.unwrap();
    w.write_chunked_body_done().await.unwrap();

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", "11");
    w.write_trailers(&trailers).await.unwrap();

    let raw = w.into_inner();
    let (head, rest) = split_head(&raw);

    assert!(head.contains("Transfer-Encoding: chunked\r\n"));
    assert!(head.contains("Trailer: X-Content-Length\r\n"));
    assert!(!head.contains("Content-Length:"));
    assert!(rest.ends_with(b"0\r\nX-Content-Length: 11\r\n\r\n"));

    let (body, decoded) = decode_chunked(rest).unwrap();
    assert_eq!(body, b"hello world");
    assert_eq!(decoded.get("x-content-length"), Some("11"));
}

#[tokio::test]
async fn test_finish_closes_declared_but_unwritten_trailers() {
    let mut headers = Headers::new();
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-Length");

    let mut w = ResponseWriter::new(Vec::new());
    w.write_headers(&headers).await.unwrap();
    w.write_chunked_body(b"data").await.unwrap();
    w.write_chunked_body_done().await.unwrap();
    w.finish().await.unwrap();

    let raw = w.into_inner();
    assert!(raw.ends_with(b"0\r\n\r\n"));

    let (_, rest) = split_head(&raw);
    let (body, trailers) = decode_chunked(rest).unwrap();
    assert_eq!(body, b"data");
    assert!(trailers.is_empty());
}

#[tokio::test]
async fn test_finish_after_trailers_writes_nothing() {
    let mut headers = Headers::new();
    headers.set("Trailer", "X-Content-Length");

    let mut w = ResponseWriter::new(Vec::new());
    w.write_headers(&headers).await.unwrap();
    w.write_chunked_body_done().await.unwrap();

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", "0");
    w.write_trailers(&trailers).await.unwrap();
    w.finish().await.unwrap();

    let raw = w.into_inner();
    assert!(raw.ends_with(b"0\r\nX-Content-Length: 0\r\n\r\n"));
}

#[tokio::test]
async fn test_finish_on_fixed_body_writes_nothing() {
    let mut w = ResponseWriter::new(Vec::new());
    w.write_body(b"abc").await.unwrap();
    w.finish().await.unwrap();

    assert_eq!(w.into_inner(), b"abc");
}
