//! Response buffering.
//!
//! [`Output`] collects the body, headers and status code of one request.
//! The body is a map of named parts; the reserved `html` part is the text
//! body. When the content type is `application/json` the whole map is sent
//! as pretty-printed JSON instead.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io;

/// Name of the body part holding the text body.
pub const HTML_KEY: &str = "html";

/// Content type that switches the body to JSON.
pub const JSON_CONTENT_TYPE: &str = "application/json";

const CONTENT_TYPE_KEY: &str = "content-type";

/// Initial content type and charset of an [`Output`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    /// Initial content type.
    pub content_type: String,
    /// Initial charset.
    pub char_set: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            content_type: "text/html".to_owned(),
            char_set: "utf-8".to_owned(),
        }
    }
}

/// The response buffer of one request.
#[derive(Debug, Clone)]
pub struct Output {
    code: u16,
    content_type: String,
    char_set: String,
    headers: IndexMap<String, String>,
    parts: Map<String, Value>,
}

impl Output {
    /// Create a buffer with the default settings (`text/html`, `utf-8`).
    pub fn new() -> Self {
        Self::with_settings(&OutputSettings::default())
    }

    /// Create a buffer from settings.
    pub fn with_settings(settings: &OutputSettings) -> Self {
        let mut parts = Map::new();
        parts.insert(HTML_KEY.to_owned(), Value::String(String::new()));

        let mut output = Self {
            code: 200,
            content_type: settings.content_type.clone(),
            char_set: settings.char_set.clone(),
            headers: IndexMap::new(),
            parts,
        };
        output.update_content_header();
        output
    }

    /// Set a named body part.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.parts.insert(key.to_owned(), value.into());
        self
    }

    /// Get a named body part.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.parts.get(key)
    }

    /// Replace the text body.
    pub fn set_output(&mut self, html: impl Into<String>) -> &mut Self {
        self.parts
            .insert(HTML_KEY.to_owned(), Value::String(html.into()));
        self
    }

    /// Append to the text body. `None` leaves it unchanged.
    pub fn append_output(&mut self, html: Option<&str>) -> &mut Self {
        let Some(html) = html else {
            return self;
        };

        match self.parts.get_mut(HTML_KEY) {
            Some(Value::String(body)) => body.push_str(html),
            Some(other) => {
                // A non-string `html` part is replaced by its text form.
                let mut body = match other {
                    Value::Null => String::new(),
                    ref value => value.to_string(),
                };
                body.push_str(html);
                *other = Value::String(body);
            }
            None => {
                self.parts
                    .insert(HTML_KEY.to_owned(), Value::String(html.to_owned()));
            }
        }
        self
    }

    /// The text body, or an empty string.
    pub fn get_output(&self) -> &str {
        self.parts
            .get(HTML_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Drop every body part, `html` included.
    pub fn flush_output(&mut self) -> &mut Self {
        self.parts.clear();
        self
    }

    /// Set the content type and refresh the `Content-Type` header.
    pub fn content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = content_type.into();
        self.update_content_header();
        self
    }

    /// Get the content type.
    pub fn get_content_type(&self) -> &str {
        &self.content_type
    }

    /// Set the charset and refresh the `Content-Type` header.
    pub fn char_set(&mut self, char_set: impl Into<String>) -> &mut Self {
        self.char_set = char_set.into();
        self.update_content_header();
        self
    }

    /// Get the charset.
    pub fn get_char_set(&self) -> &str {
        &self.char_set
    }

    /// Set a header line.
    ///
    /// Headers are keyed case-insensitively, by `key` when given and by the
    /// header name (the text before `:`) otherwise. Setting an existing key
    /// replaces the line but keeps its position.
    pub fn header(&mut self, line: impl Into<String>, key: Option<&str>) -> &mut Self {
        let line = line.into();
        let key = match key {
            Some(key) => key.to_lowercase(),
            None => header_name(&line).to_lowercase(),
        };
        self.headers.insert(key, line);
        self
    }

    /// Header lines, in first-insertion order.
    pub fn get_headers(&self) -> Vec<&str> {
        self.headers.values().map(String::as_str).collect()
    }

    /// Set the status code.
    pub fn response_code(&mut self, code: u16) -> &mut Self {
        self.code = code;
        self
    }

    /// Get the status code.
    pub fn get_response_code(&self) -> u16 {
        self.code
    }

    /// The serialized body.
    pub fn render(&self) -> String {
        if self.content_type == JSON_CONTENT_TYPE {
            format!("{:#}", Value::Object(self.parts.clone()))
        } else {
            self.get_output().to_owned()
        }
    }

    /// Produce the response to emit.
    ///
    /// `exit` is carried on the response; the host ends the process or
    /// connection after writing it.
    pub fn send(&self, exit: bool) -> Response {
        let response = Response {
            status: self.code,
            headers: self.headers.values().cloned().collect(),
            body: self.render(),
            exit,
        };

        tracing::debug!(
            status = response.status,
            headers = response.headers.len(),
            bytes = response.body.len(),
            "output sent"
        );

        response
    }

    fn update_content_header(&mut self) {
        let line = format!("Content-Type: {}; charset={}", self.content_type, self.char_set);
        self.header(line, Some(CONTENT_TYPE_KEY));
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

fn header_name(line: &str) -> &str {
    line.split_once(':').map_or(line, |(name, _)| name).trim()
}

/// A finished response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code.
    pub status: u16,
    /// Header lines, in send order.
    pub headers: Vec<String>,
    /// Serialized body.
    pub body: String,
    /// Whether the host should stop after emitting this response.
    pub exit: bool,
}

impl Response {
    /// Write the response in CGI form: a `Status:` line, the headers, a blank
    /// line and the body.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "Status: {}\r\n", self.status)?;
        for header in &self.headers {
            write!(out, "{header}\r\n")?;
        }
        out.write_all(b"\r\n")?;
        out.write_all(self.body.as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let output = Output::new();

        assert_eq!(output.get_response_code(), 200);
        assert_eq!(output.get_content_type(), "text/html");
        assert_eq!(output.get_char_set(), "utf-8");
        assert_eq!(
            output.get_headers(),
            vec!["Content-Type: text/html; charset=utf-8"]
        );
        assert_eq!(output.get_output(), "");
    }

    #[test]
    fn test_append_output() {
        let mut output = Output::new();
        output
            .append_output(Some("Hello"))
            .append_output(None)
            .append_output(Some(" World"));

        assert_eq!(output.get_output(), "Hello World");
        assert_eq!(output.render(), "Hello World");

        output.set_output("replaced");
        assert_eq!(output.get_output(), "replaced");
    }

    #[test]
    fn test_content_header_tracks_type_and_charset() {
        let mut output = Output::new();
        output.header("X-First: 1", None);
        output.content_type("application/json").char_set("latin1");

        assert_eq!(
            output.get_headers(),
            vec!["Content-Type: application/json; charset=latin1", "X-First: 1"]
        );
    }

    #[test]
    fn test_header_overwrite_keeps_position() {
        let mut output = Output::new();
        output
            .header("X-A: 1", None)
            .header("X-B: 2", None)
            .header("x-a: 3", None)
            .header("Location: /a", Some("redirect"))
            .header("Location: /b", Some("Redirect"));

        assert_eq!(
            output.get_headers(),
            vec![
                "Content-Type: text/html; charset=utf-8",
                "x-a: 3",
                "X-B: 2",
                "Location: /b"
            ]
        );
    }

    #[test]
    fn test_json_body_includes_every_part() {
        let mut output = Output::new();
        output
            .content_type(JSON_CONTENT_TYPE)
            .set("name", "Johnny")
            .set("age", 23);

        let body: Value = serde_json::from_str(&output.render()).unwrap();
        assert_eq!(body, json!({"html": "", "name": "Johnny", "age": 23}));
        assert!(output.render().contains('\n'));
        assert_eq!(output.get("age"), Some(&json!(23)));
    }

    #[test]
    fn test_flush_output() {
        let mut output = Output::new();
        output.append_output(Some("text")).set("extra", true);
        output.flush_output();

        assert_eq!(output.get_output(), "");
        assert_eq!(output.get("extra"), None);

        output.append_output(Some("again"));
        assert_eq!(output.get_output(), "again");
    }

    #[test]
    fn test_settings_from_json() {
        let settings: OutputSettings =
            serde_json::from_str(r#"{"contentType": "text/plain"}"#).unwrap();
        let output = Output::with_settings(&settings);

        assert_eq!(output.get_content_type(), "text/plain");
        assert_eq!(output.get_char_set(), "utf-8");
    }

    #[test]
    fn test_send_and_write() {
        let mut output = Output::new();
        output.response_code(404).append_output(Some("missing"));

        let response = output.send(false);
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "missing");
        assert!(!response.exit);

        let mut buf = Vec::new();
        response.write_to(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Status: 404\r\nContent-Type: text/html; charset=utf-8\r\n\r\nmissing"
        );
    }
}
