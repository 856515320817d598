use rawhttp::http::request::{
    DEFAULT_ACCEPT, DEFAULT_USER_AGENT, Method, Request, RequestBuilder, encode_request,
};

#[test]
fn test_encode_request_exact_wire_format() {
    let encoded = encode_request("example.com", 8080, "/a/b.html");

    let expected = format!(
        "GET /a/b.html HTTP/1.0\r\nHost: example.com:8080\r\nUser-Agent: {}\r\nAccept: {}\r\n\r\n",
        DEFAULT_USER_AGENT, DEFAULT_ACCEPT
    );
    assert_eq!(encoded, expected);
}

#[test]
fn test_encode_request_is_deterministic() {
    assert_eq!(
        encode_request("localhost", 3000, "/"),
        encode_request("localhost", 3000, "/")
    );
}

#[test]
fn test_encode_request_host_header_always_has_port() {
    let encoded = encode_request("example.com", 80, "/");
    assert!(encoded.contains("\r\nHost: example.com:80\r\n"));
}

#[test]
fn test_encode_request_ends_with_single_blank_line() {
    let encoded = encode_request("example.com", 80, "/");
    assert!(encoded.ends_with("\r\n\r\n"));
    assert!(!encoded.ends_with("\r\n\r\n\r\n"));
    assert_eq!(encoded.matches("\r\n\r\n").count(), 1);
}

#[test]
fn test_request_get_header_order() {
    let req = Request::get("example.com", 80, "/");
    let names: Vec<&str> = req.headers.iter().map(|(k, _)| k.as_str()).collect();

    assert_eq!(names, vec!["Host", "User-Agent", "Accept"]);
}

#[test]
fn test_request_get_with_agent() {
    let req = Request::get_with_agent("example.com", 80, "/", "test-client", "*/*");

    assert_eq!(req.header("User-Agent"), Some("test-client"));
    assert_eq!(req.header("accept"), Some("*/*"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_builder_defaults_to_http10() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/index.html")
        .header("Host", "localhost:3000")
        .build()
        .unwrap();

    assert_eq!(req.version, "HTTP/1.0");
    assert_eq!(
        req.to_string(),
        "GET /index.html HTTP/1.0\r\nHost: localhost:3000\r\n\r\n"
    );
}

#[test]
fn test_request_builder_missing_fields() {
    assert_eq!(RequestBuilder::new().path("/").build().unwrap_err(), "method missing");
    assert_eq!(
        RequestBuilder::new().method(Method::GET).build().unwrap_err(),
        "path missing"
    );
}

#[test]
fn test_method_from_str() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("POST"), None);
    assert_eq!(Method::from_str("get"), None);
    assert_eq!(Method::GET.as_str(), "GET");
}
