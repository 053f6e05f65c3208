/// Where an image's encoded bytes live. Images are never decoded here; the
/// host loads them from the recorded source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// External file or `data:` URI.
    Uri(String),
    /// Bytes embedded in a buffer view of the document.
    BufferView { view: usize, mime_type: String },
}

/// An image referenced by the document whose bytes are reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub name: String,
    pub source: ImageSource,
}

impl ImageAsset {
    pub fn new(name: impl Into<String>, source: ImageSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}
