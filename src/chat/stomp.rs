use std::error::Error;
use std::fmt;

/// Minimal STOMP 1.2 framing over WebSocket text messages: just the commands
/// the chat broker speaks. Heartbeats are negotiated off (0,0).
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub command: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Debug)]
pub enum StompError {
    MissingCommand,
    BadHeader(String),
}

impl fmt::Display for StompError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StompError::MissingCommand => write!(f, "frame has no command line"),
            StompError::BadHeader(line) => write!(f, "malformed header line: {line}"),
        }
    }
}

impl Error for StompError {}

impl Frame {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn encode(&self) -> String {
        let escape_headers = self.command != "CONNECT" && self.command != "CONNECTED";
        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(&self.command);
        out.push('\n');
        for (key, value) in &self.headers {
            if escape_headers {
                out.push_str(&escape(key));
                out.push(':');
                out.push_str(&escape(value));
            } else {
                out.push_str(key);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parses one frame. `Ok(None)` for heartbeat newlines.
    pub fn parse(raw: &str) -> Result<Option<Frame>, StompError> {
        let raw = raw.trim_end_matches('\0');
        if raw.trim_matches(['\r', '\n']).is_empty() {
            return Ok(None);
        }
        let (head, body) = if let Some((head, body)) = raw.split_once("\r\n\r\n") {
            (head, body)
        } else if let Some((head, body)) = raw.split_once("\n\n") {
            (head, body)
        } else {
            (raw, "")
        };
        let mut lines = head.lines();
        let command = lines
            .next()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .ok_or(StompError::MissingCommand)?
            .to_string();
        let unescape_headers = command != "CONNECT" && command != "CONNECTED";
        let mut headers = Vec::new();
        for line in lines {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| StompError::BadHeader(line.to_string()))?;
            if unescape_headers {
                headers.push((unescape(key), unescape(value)));
            } else {
                headers.push((key.to_string(), value.to_string()));
            }
        }
        Ok(Some(Frame {
            command,
            headers,
            body: body.to_string(),
        }))
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('c') => out.push(':'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

pub fn connect_frame(host: &str, token: &str) -> Frame {
    Frame::new("CONNECT")
        .header("accept-version", "1.2")
        .header("host", host)
        .header("heart-beat", "0,0")
        .header("Authorization", &format!("Bearer {token}"))
}

pub fn subscribe_frame(id: &str, destination: &str) -> Frame {
    Frame::new("SUBSCRIBE")
        .header("id", id)
        .header("destination", destination)
}

pub fn unsubscribe_frame(id: &str) -> Frame {
    Frame::new("UNSUBSCRIBE").header("id", id)
}

pub fn send_frame(destination: &str, body: &str) -> Frame {
    Frame::new("SEND")
        .header("destination", destination)
        .header("content-type", "application/json")
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_terminates_with_nul() {
        let encoded = send_frame("/app/chat.send/7", r#"{"content":"hi"}"#).encode();
        assert!(encoded.starts_with("SEND\n"));
        assert!(encoded.contains("destination:/app/chat.send/7\n"));
        assert!(encoded.ends_with("{\"content\":\"hi\"}\0"));
    }

    #[test]
    fn parse_roundtrips_message_frame() {
        let raw = "MESSAGE\ndestination:/topic/chat.room.7\nsubscription:sub-1\n\n{\"content\":\"hi\"}\0";
        let frame = Frame::parse(raw).unwrap().unwrap();
        assert_eq!(frame.command, "MESSAGE");
        assert_eq!(frame.get("destination"), Some("/topic/chat.room.7"));
        assert_eq!(frame.body, "{\"content\":\"hi\"}");
    }

    #[test]
    fn heartbeat_is_not_a_frame() {
        assert!(Frame::parse("\n").unwrap().is_none());
        assert!(Frame::parse("\r\n").unwrap().is_none());
    }

    #[test]
    fn connect_headers_are_not_escaped() {
        let encoded = connect_frame("broker.local", "abc").encode();
        assert!(encoded.contains("Authorization:Bearer abc\n"));
        assert!(encoded.contains("accept-version:1.2\n"));
    }

    #[test]
    fn header_escapes_roundtrip() {
        let frame = Frame::new("SEND").header("key", "a:b\\c\nd");
        let parsed = Frame::parse(&frame.encode()).unwrap().unwrap();
        assert_eq!(parsed.get("key"), Some("a:b\\c\nd"));
    }

    #[test]
    fn malformed_header_is_an_error() {
        assert!(matches!(
            Frame::parse("MESSAGE\nno-colon-here\n\nbody\0"),
            Err(StompError::BadHeader(_))
        ));
    }

    #[test]
    fn parse_tolerates_crlf() {
        let raw = "CONNECTED\r\nversion:1.2\r\n\r\n\0";
        let frame = Frame::parse(raw).unwrap().unwrap();
        assert_eq!(frame.command, "CONNECTED");
        assert_eq!(frame.get("version"), Some("1.2"));
    }
}
