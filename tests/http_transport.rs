use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use payamak::{Credentials, GatewayClient, GatewayError};

/// Serve one HTTP request with `body`, returning the raw request it received.
fn serve_once(listener: TcpListener, body: &'static str) -> JoinHandle<String> {
    serve_once_with_status(listener, "200 OK", body)
}

fn serve_once_with_status(
    listener: TcpListener,
    status_line: &'static str,
    body: &'static str,
) -> JoinHandle<String> {
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let request = read_request(&stream);
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
        request
    })
}

fn read_request(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut head = String::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap();
            }
        }
        head.push_str(&line);
        if line == "\r\n" || line.is_empty() {
            break;
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).unwrap();
    head + &String::from_utf8(body).unwrap()
}

fn client_for(base: &str) -> GatewayClient {
    GatewayClient::builder(Credentials::new("user", "p&ss", "3000").unwrap())
        .send_endpoint(format!("{base}/sms/send"))
        .bulk_endpoint(format!("{base}/sms/sendBulk"))
        .balance_endpoint(format!("{base}/sms/balance"))
        .status_endpoint(format!("{base}/sms/status"))
        .soap_descriptor(format!("{base}/soap?wsdl"))
        .build()
        .unwrap()
}

#[test]
fn form_fields_reach_the_wire_url_encoded() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = serve_once(listener, "ok");

    let client = client_for(&base);
    assert!(client.send_bulk_sms(&["A", "B"], "hi there").unwrap());

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /sms/sendBulk HTTP/1.1\r\n"));
    assert!(
        request
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded")
    );
    assert!(request.ends_with("username=user&password=p%26ss&from=3000&to=A%2CB&text=hi+there"));
}

#[test]
fn balance_is_read_from_plain_body() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = serve_once(listener, "123.45");

    let client = client_for(&base);
    assert_eq!(client.get_balance().unwrap().value(), 123.45);
    server.join().unwrap();
}

#[test]
fn error_pages_are_returned_as_bodies() {
    let page = "<html><body>Internal Server Error</body></html>";

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = serve_once_with_status(listener, "500 Internal Server Error", page);
    let client = client_for(&base);
    assert_eq!(client.get_sms_status("m1").unwrap().as_str(), page);
    server.join().unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = serve_once_with_status(listener, "500 Internal Server Error", page);
    let client = client_for(&base);
    assert!(client.send_sms("A", "msg").unwrap());
    server.join().unwrap();
}

#[test]
fn connection_refused_is_a_transport_error() {
    // Bind then drop to get a local port with nothing listening on it.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = client_for(&format!("http://127.0.0.1:{port}"));

    assert!(matches!(
        client.send_sms("A", "msg"),
        Err(GatewayError::Transport(_))
    ));
    assert!(matches!(
        client.get_sms_status("m1"),
        Err(GatewayError::Transport(_))
    ));

    let err = client.send_sms_soap("A", "msg").unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert!(err.soap_error().is_none());
}
