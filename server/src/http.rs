//! Just enough HTTP/1.1 to answer one JSON request per connection.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::{Result, ServerError};

pub const MAX_HEAD_BYTES: usize = 8 * 1024;
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    /// Request target without its query string.
    pub path: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Response {
        match serde_json::to_vec(value) {
            Ok(body) => Response { status, body },
            Err(e) => {
                log::error!("failed to serialize response: {e}");
                Response {
                    status: 500,
                    body: br#"{"exito":false,"error":"500 - Error interno del servidor"}"#.to_vec(),
                }
            }
        }
    }

    pub fn empty(status: u16) -> Response {
        Response {
            status,
            body: Vec::new(),
        }
    }

    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason());
        if !self.body.is_empty() {
            head.push_str("Content-Type: application/json; charset=utf-8\r\n");
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Read one request. `Ok(None)` means the peer closed the connection
/// before sending anything.
pub async fn read_request<R>(reader: &mut R) -> Result<Option<Request>>
where
    R: AsyncBufRead + Unpin,
{
    let mut head_len = 0;

    let line = match read_head_line(reader, &mut head_len).await? {
        Some(line) => line,
        None => return Ok(None),
    };

    let mut parts = line.split_whitespace();
    let (method, target, version) = match (parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(target), Some(version)) => (method, target, version),
        _ => return Err(bad_request(format!("malformed request line {:?}", line.trim_end()))),
    };
    if !version.starts_with("HTTP/1.") {
        return Err(bad_request(format!("unsupported protocol {version}")));
    }
    let method = method.to_ascii_uppercase();
    let path = target.split('?').next().unwrap_or(target).to_string();

    let mut content_length = 0;
    loop {
        let header = match read_head_line(reader, &mut head_len).await? {
            Some(header) => header,
            None => {
                return Err(bad_request("connection closed inside the request head".to_string()))
            }
        };

        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        let (name, value) = match header.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => return Err(bad_request(format!("malformed header {header:?}"))),
        };
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value
                .parse::<usize>()
                .map_err(|_| bad_request(format!("invalid content length {value:?}")))?;
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            return Err(bad_request(format!("unsupported transfer encoding {value:?}")));
        }
    }

    if content_length > MAX_BODY_BYTES {
        return Err(bad_request(format!("body of {content_length} bytes is too large")));
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).await?;

    Ok(Some(Request { method, path, body }))
}

/// Read one `\n`-terminated line of the request head, never buffering more
/// than what is left of `MAX_HEAD_BYTES`. `Ok(None)` on a clean end of stream.
async fn read_head_line<R>(reader: &mut R, head_len: &mut usize) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let remaining = MAX_HEAD_BYTES.saturating_sub(*head_len);
    if remaining == 0 {
        return Err(bad_request("request head is too large".to_string()));
    }

    let mut line = Vec::new();
    let n = (&mut *reader)
        .take(remaining as u64)
        .read_until(b'\n', &mut line)
        .await?;
    *head_len += n;

    if n == 0 {
        return Ok(None);
    }
    if !line.ends_with(b"\n") {
        if n == remaining {
            return Err(bad_request("request head is too large".to_string()));
        }
        return Err(bad_request("connection closed inside the request head".to_string()));
    }

    String::from_utf8(line)
        .map(Some)
        .map_err(|_| bad_request("request head is not valid UTF-8".to_string()))
}

fn bad_request(msg: String) -> ServerError {
    ServerError::BadRequest(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, BufReader};

    async fn parse(raw: &str) -> Result<Option<Request>> {
        let mut reader = BufReader::new(raw.as_bytes());
        read_request(&mut reader).await
    }

    #[tokio::test]
    async fn read_request_works() {
        let raw = "POST /api/predecir?x=1 HTTP/1.1\r\nHost: localhost\r\ncontent-length: 25\r\n\r\n{\"anos_experiencia\": 5.0}";
        let request = parse(raw).await.unwrap().unwrap();

        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/predecir");
        assert_eq!(request.body, br#"{"anos_experiencia": 5.0}"#.to_vec());
    }

    #[tokio::test]
    async fn read_request_without_body() {
        let request = parse("get /api/datos HTTP/1.0\r\n\r\n").await.unwrap().unwrap();

        assert_eq!(request.method, "GET");
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn read_request_on_closed_connection() {
        assert_eq!(parse("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_request_rejects_garbage() {
        for raw in &[
            "hello\r\n\r\n",
            "GET / SPDY/3\r\n\r\n",
            "GET / HTTP/1.1\r\nno-colon\r\n\r\n",
            "GET / HTTP/1.1\r\nContent-Length: lots\r\n\r\n",
            "POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n",
            "GET / HTTP/1.1\r\nHost: localhost\r\n",
        ] {
            assert!(
                matches!(parse(raw).await, Err(ServerError::BadRequest(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn read_request_rejects_large_bodies() {
        let raw = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", MAX_BODY_BYTES + 1);
        assert!(matches!(parse(&raw).await, Err(ServerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn read_request_stops_at_the_head_limit() {
        let endless = tokio::io::repeat(b'A').take(4 * MAX_HEAD_BYTES as u64);
        let mut reader = BufReader::new(endless);

        let res = read_request(&mut reader).await;
        assert!(matches!(res, Err(ServerError::BadRequest(_))));

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).await.unwrap();
        assert!(rest.len() >= 2 * MAX_HEAD_BYTES, "read {} bytes", 4 * MAX_HEAD_BYTES - rest.len());
    }

    #[tokio::test]
    async fn read_request_stops_at_the_head_limit_across_headers() {
        let mut raw = String::from("GET / HTTP/1.1\r\n");
        while raw.len() <= MAX_HEAD_BYTES {
            raw.push_str("X-Filler: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n");
        }
        raw.push_str("\r\n");

        assert!(matches!(parse(&raw).await, Err(ServerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn read_request_rejects_non_utf8_heads() {
        for raw in &[
            &b"GET /api/datos HTTP/1.1\r\nX-Name: \xff\xfe\r\n\r\n"[..],
            &b"GET /\xff HTTP/1.1\r\n\r\n"[..],
        ] {
            let mut reader = BufReader::new(*raw);
            assert!(
                matches!(read_request(&mut reader).await, Err(ServerError::BadRequest(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn to_bytes_works() {
        let response = Response::json(200, &serde_json::json!({ "exito": true }));
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/json; charset=utf-8\r\n"));
        assert!(text.contains("Content-Length: 14\r\n"));
        assert!(text.ends_with("\r\n\r\n{\"exito\":true}"));
    }

    #[test]
    fn empty_response_has_no_content_type() {
        let text = String::from_utf8(Response::empty(204).to_bytes()).unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 204 No Content\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
    }
}
