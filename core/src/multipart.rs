//! `multipart/form-data` encoding (RFC 7578).
//!
//! Freshdesk only accepts avatar uploads as multipart, so every contact write
//! goes through this encoder. Text fields become plain parts; file fields get a
//! `filename` and their own `Content-Type`.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    File {
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

/// Ordered list of form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

/// Wire form of a `MultipartForm`: the `Content-Type` header value and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedForm {
    pub content_type: String,
    pub body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(Part {
            name: name.to_string(),
            body: PartBody::Text(value.to_string()),
        });
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        self.parts.push(Part {
            name: name.to_string(),
            body: PartBody::File {
                filename: filename.to_string(),
                content_type: content_type.to_string(),
                bytes,
            },
        });
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Look up a part by field name.
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Encode with a fresh random boundary.
    pub fn encode(&self) -> EncodedForm {
        let boundary = format!("----contact-sync-{}", Uuid::new_v4().simple());
        self.encode_with_boundary(&boundary)
    }

    pub fn encode_with_boundary(&self, boundary: &str) -> EncodedForm {
        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match &part.body {
                PartBody::Text(value) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_quoted(&part.name)
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                PartBody::File {
                    filename,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n",
                            escape_quoted(&part.name),
                            escape_quoted(filename),
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        EncodedForm {
            content_type: format!("multipart/form-data; boundary={boundary}"),
            body,
        }
    }
}

// Quotes and line breaks would terminate the header parameter early.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
