//! Minimal HTTP helpers for the browser control page.
//!
//! One request per connection: only the request line matters, headers are
//! read and discarded by the server task.
use core::fmt::Write;

use heapless::String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    Page,
    Status,
    Command(&'a str),
    NotFound,
    BadRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
}

impl StatusCode {
    fn as_str(self) -> &'static str {
        match self {
            StatusCode::Ok => "200 OK",
            StatusCode::BadRequest => "400 Bad Request",
            StatusCode::NotFound => "404 Not Found",
        }
    }
}

/// Classifies the first line of a request (`GET /cmd/forward HTTP/1.1`).
pub fn parse_request_line(line: &str) -> Request<'_> {
    let mut tokens = line.split_whitespace();
    let (Some(method), Some(target)) = (tokens.next(), tokens.next()) else {
        return Request::BadRequest;
    };
    if method != "GET" {
        return Request::BadRequest;
    }

    let path = target.split('?').next().unwrap_or(target);
    match path {
        "/" | "/index.html" => Request::Page,
        "/status" => Request::Status,
        _ => match path.strip_prefix("/cmd/") {
            Some(cmd) if !cmd.is_empty() => Request::Command(cmd),
            _ => Request::NotFound,
        },
    }
}

/// Decodes `%XX` escapes of a path segment into at most `N` bytes.
/// Malformed escapes are kept as they are; a character cut by the capacity
/// is dropped.
pub fn percent_decode<const N: usize>(segment: &str) -> String<N> {
    let bytes = segment.as_bytes();
    let mut out: heapless::Vec<u8, N> = heapless::Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let (byte, used) = match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => (hi << 4 | lo, 3),
                    _ => (b'%', 1),
                }
            }
            b => (b, 1),
        };
        if out.push(byte).is_err() {
            break;
        }
        i += used;
    }

    let valid = match core::str::from_utf8(&out) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&out[..e.valid_up_to()]).unwrap_or_default(),
    };
    let mut decoded = String::new();
    let _ = decoded.push_str(valid);
    decoded
}

fn hex(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Status line and headers, terminated by the blank line.
pub fn response_head(code: StatusCode, content_type: &str, content_length: usize) -> String<128> {
    let mut head = String::new();
    let _ = write!(
        head,
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        code.as_str(),
        content_type,
        content_length
    );
    head
}

pub const CONTROL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Rover Control</title>
    <script>
        function sendCmd(cmd) {
            fetch('/cmd/' + cmd).then(() => refresh());
        }
        function refresh() {
            fetch('/status').then(r => r.text()).then(t => {
                document.getElementById('status').textContent = t;
            });
        }
        setInterval(refresh, 1000);
    </script>
</head>
<body onload="refresh()">
    <h2>Motor Control</h2>
    <button onclick="sendCmd('forward')">Forward</button>
    <button onclick="sendCmd('backward')">Backward</button>
    <button onclick="sendCmd('left')">Left</button>
    <button onclick="sendCmd('right')">Right</button>
    <button onclick="sendCmd('stop')">Stop</button>

    <h2>Pan-Tilt Control</h2>
    <button onclick="sendCmd('pan_left')">Pan Left</button>
    <button onclick="sendCmd('pan_right')">Pan Right</button>
    <br>
    <button onclick="sendCmd('tilt_up')">Tilt Up</button>
    <button onclick="sendCmd('tilt_down')">Tilt Down</button>

    <p id="status"></p>
</body>
</html>
"#;
