use bytes::Bytes;
use serde::Serialize;

/// The payload of a request.
///
/// The variant records what kind of payload it is, so middlewares can make decisions (for
/// example about the `Content-Type` header) without inspecting the bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A body that already is a string and is sent as is.
    Text(String),
    /// A structured payload that has not been encoded yet.
    Json(serde_json::Value),
    /// A structured payload already encoded to JSON text.
    SerializedJson(String),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    Multipart(MultipartForm),
    Blob(Bytes),
    Buffer(Vec<u8>),
}

impl Body {
    /// Build a structured body from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Body> {
        serde_json::to_value(value).map(Body::Json)
    }

    /// Build a url-encoded form body.
    pub fn form<K, V, I>(pairs: I) -> Body
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Body::Form(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            Body::Text(_) => BodyKind::Text,
            Body::Json(_) | Body::SerializedJson(_) => BodyKind::Structured,
            Body::Form(_) => BodyKind::Form,
            Body::Multipart(_) => BodyKind::MultipartForm,
            Body::Blob(_) => BodyKind::Blob,
            Body::Buffer(_) => BodyKind::Buffer,
        }
    }

    /// The textual payload, for bodies that are strings.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) | Body::SerializedJson(text) => Some(text),
            _ => None,
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Body {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Body {
        Body::Text(text.to_owned())
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Body {
        Body::Json(value)
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Body {
        Body::Blob(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(buffer: Vec<u8>) -> Body {
        Body::Buffer(buffer)
    }
}

impl From<MultipartForm> for Body {
    fn from(form: MultipartForm) -> Body {
        Body::Multipart(form)
    }
}

/// Classification of a request body, absent bodies included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    None,
    Form,
    MultipartForm,
    Blob,
    Buffer,
    Structured,
    Text,
}

impl BodyKind {
    pub fn of(body: Option<&Body>) -> BodyKind {
        body.map_or(BodyKind::None, Body::kind)
    }
}

/// A `multipart/form-data` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<(String, Part)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(name, Part::text(value))
    }

    pub fn part(mut self, name: impl Into<String>, part: Part) -> Self {
        self.parts.push((name.into(), part));
        self
    }

    pub fn parts(&self) -> impl Iterator<Item = (&str, &Part)> {
        self.parts.iter().map(|(name, part)| (name.as_str(), part))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// One field of a [`MultipartForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    data: Bytes,
    file_name: Option<String>,
    mime: Option<String>,
}

impl Part {
    pub fn text(value: impl Into<String>) -> Self {
        Part::bytes(Bytes::from(value.into()))
    }

    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Part {
            data: data.into(),
            file_name: None,
            mime: None,
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn get_file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn get_mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }
}
