/// One entry of a drag payload.
///
/// Browsers deliver dropped files, typed items and plain `(type, value)`
/// pairs; all three are normalized into this shape before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferItem {
    /// MIME-like type string, e.g. `"image/png"` or `"application/json"`.
    pub mime_type: String,
    pub data: TransferData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferData {
    Text(String),
    File { name: Option<String>, bytes: Vec<u8> },
}

impl TransferItem {
    pub fn text(mime_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: TransferData::Text(text.into()),
        }
    }

    pub fn file(mime_type: impl Into<String>, name: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: TransferData::File { name, bytes },
        }
    }

    /// Returns the payload as text; file payloads are decoded as UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            TransferData::Text(s) => Some(s),
            TransferData::File { bytes, .. } => std::str::from_utf8(bytes).ok(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.data, TransferData::File { .. })
    }
}
