//! Emitted assets and their content representations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Composite source built from ordered text parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcatSource {
    parts: Vec<String>,
}

impl ConcatSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part after everything added so far
    pub fn add(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }

    /// The concatenated text
    pub fn source(&self) -> String {
        self.parts.concat()
    }
}

impl From<String> for ConcatSource {
    fn from(part: String) -> Self {
        Self { parts: vec![part] }
    }
}

/// How the host holds the content of an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetContent {
    /// A source object the host renders later
    Source(ConcatSource),
    /// Already rendered text
    Value(String),
    /// Raw bytes with no text representation
    Binary(Vec<u8>),
}

impl AssetContent {
    /// Text of the asset, or `None` for binary content
    pub fn text(&self) -> Option<String> {
        match self {
            AssetContent::Source(source) => Some(source.source()),
            AssetContent::Value(value) => Some(value.clone()),
            AssetContent::Binary(_) => None,
        }
    }
}

/// Assets by output file name, in emission order
pub type AssetMap = IndexMap<String, AssetContent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_source_preserves_order() {
        let mut source = ConcatSource::new();
        source.add("@import \"./common.wxss\";");
        source.add("\n");
        source.add(".page {}");
        assert_eq!(source.source(), "@import \"./common.wxss\";\n.page {}");
    }

    #[test]
    fn test_asset_content_text() {
        assert_eq!(AssetContent::Value("a".into()).text().as_deref(), Some("a"));
        assert_eq!(
            AssetContent::Source(ConcatSource::from("b".to_string())).text().as_deref(),
            Some("b")
        );
        assert_eq!(AssetContent::Binary(vec![0, 1]).text(), None);
    }

    #[test]
    fn test_asset_content_json_shape() {
        let value: AssetContent = serde_json::from_str(r#"{"value":"x"}"#).unwrap();
        let source: AssetContent = serde_json::from_str(r#"{"source":["a","b"]}"#).unwrap();
        assert_eq!(value, AssetContent::Value("x".into()));
        assert_eq!(source.text().as_deref(), Some("ab"));
    }
}
