//! STOMP 1.2 text frame codec

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// STOMP frame codec errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameError {
    /// Frame ended before its NUL terminator
    #[error("Truncated frame")]
    Truncated,
    /// Command line is not a STOMP command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// Header line without a colon
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    /// Backslash followed by an undefined escape
    #[error("Invalid header escape in: {0}")]
    InvalidEscape(String),
    /// `content-length` is not a byte count
    #[error("Invalid content-length: {0}")]
    InvalidContentLength(String),
}

/// Frame commands used by a subscribing client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Stomp,
    Connected,
    Subscribe,
    Unsubscribe,
    Disconnect,
    Send,
    Message,
    Receipt,
    Error,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Stomp => "STOMP",
            Command::Connected => "CONNECTED",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Disconnect => "DISCONNECT",
            Command::Send => "SEND",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
        }
    }

    /// CONNECT and CONNECTED headers are never escaped
    fn escapes_headers(&self) -> bool {
        !matches!(self, Command::Connect | Command::Stomp | Command::Connected)
    }
}

impl FromStr for Command {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CONNECT" => Command::Connect,
            "STOMP" => Command::Stomp,
            "CONNECTED" => Command::Connected,
            "SUBSCRIBE" => Command::Subscribe,
            "UNSUBSCRIBE" => Command::Unsubscribe,
            "DISCONNECT" => Command::Disconnect,
            "SEND" => Command::Send,
            "MESSAGE" => Command::Message,
            "RECEIPT" => Command::Receipt,
            "ERROR" => Command::Error,
            other => return Err(FrameError::UnknownCommand(other.to_string())),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single STOMP frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// CONNECT frame for STOMP 1.2 without heart-beating
    pub fn connect(host: &str) -> Self {
        Frame::new(Command::Connect)
            .header("accept-version", "1.2")
            .header("host", host)
            .header("heart-beat", "0,0")
    }

    /// SUBSCRIBE frame with automatic acknowledgement
    pub fn subscribe(id: &str, destination: &str) -> Self {
        Frame::new(Command::Subscribe)
            .header("id", id)
            .header("destination", destination)
            .header("ack", "auto")
    }

    pub fn disconnect() -> Self {
        Frame::new(Command::Disconnect)
    }

    /// First value of a header; repeated headers keep their first occurrence
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize to wire text, NUL terminator included
    pub fn encode(&self) -> String {
        let escape = self.command.escapes_headers();
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(self.command.as_str());
        out.push('\n');
        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
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

    /// Parse one frame from the start of `input`, returning it and the bytes consumed
    fn parse_one(input: &str) -> Result<(Frame, usize), FrameError> {
        let mut pos = 0;
        let command_line = next_line(input, &mut pos)?;
        let command: Command = command_line.parse()?;

        let mut headers: Vec<(String, String)> = Vec::new();
        loop {
            let line = next_line(input, &mut pos)?;
            if line.is_empty() {
                break;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| FrameError::MalformedHeader(line.to_string()))?;
            let (name, value) = if command.escapes_headers() {
                (unescape_header(name)?, unescape_header(value)?)
            } else {
                (name.to_string(), value.to_string())
            };
            if !headers.iter().any(|(k, _)| *k == name) {
                headers.push((name, value));
            }
        }

        let content_length = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .map(|(_, v)| {
                v.trim()
                    .parse::<usize>()
                    .map_err(|_| FrameError::InvalidContentLength(v.clone()))
            })
            .transpose()?;

        let body_end = match content_length {
            Some(len) => {
                let end = pos
                    .checked_add(len)
                    .ok_or_else(|| FrameError::InvalidContentLength(len.to_string()))?;
                if input.as_bytes().get(end) != Some(&0) {
                    return Err(FrameError::Truncated);
                }
                end
            }
            None => pos + input[pos..].find('\0').ok_or(FrameError::Truncated)?,
        };
        let body = input.get(pos..body_end).ok_or(FrameError::Truncated)?;

        let frame = Frame {
            command,
            headers,
            body: body.to_string(),
        };
        Ok((frame, body_end + 1))
    }
}

/// Decode every frame in a WebSocket text message
///
/// Bare EOLs between frames are heart-beats and are skipped, so a message
/// holding only a heart-beat decodes to no frames.
pub fn decode(text: &str) -> Result<Vec<Frame>, FrameError> {
    let mut frames = Vec::new();
    let mut rest = text;
    loop {
        rest = rest.trim_start_matches(['\r', '\n']);
        if rest.is_empty() {
            break;
        }
        let (frame, consumed) = Frame::parse_one(rest)?;
        frames.push(frame);
        rest = &rest[consumed..];
    }
    Ok(frames)
}

fn next_line<'a>(input: &'a str, pos: &mut usize) -> Result<&'a str, FrameError> {
    let rest = &input[*pos..];
    let end = rest.find('\n').ok_or(FrameError::Truncated)?;
    *pos += end + 1;
    let line = &rest[..end];
    Ok(line.strip_suffix('\r').unwrap_or(line))
}

fn escape_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_header(raw: &str) -> Result<String, FrameError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            _ => return Err(FrameError::InvalidEscape(raw.to_string())),
        }
    }
    Ok(out)
}
