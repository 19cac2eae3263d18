//! Merging shared chunk stylesheets into the app stylesheet

use tracing::debug;

use crate::bundler::{AssetContent, AssetMap, ConcatSource};
use crate::error::{LoadChunksError, Result};
use crate::utils::{base_name, is_style_file, url_to_request};

/// Style merge registered by an app entry chunk during render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMergeJob {
    /// Key of the chunk that registered the job
    pub chunk: String,
    /// Output files of that chunk
    pub files: Vec<String>,
    /// Shared chunk names whose stylesheets get merged
    pub common_chunks: Vec<String>,
}

impl StyleMergeJob {
    /// Prefix each of the chunk's stylesheets with the shared stylesheets.
    ///
    /// Every other stylesheet whose base name is a shared chunk name is added,
    /// in asset order, as an `@import` line followed by its content. The
    /// original stylesheet follows. Returns the number of stylesheets rewritten.
    pub fn run(&self, assets: &mut AssetMap) -> Result<usize> {
        let mut rewritten = 0;

        for file in self.files.iter().filter(|file| is_style_file(file)) {
            let original = assets
                .get(file)
                .ok_or_else(|| LoadChunksError::MissingAsset {
                    chunk: self.chunk.clone(),
                    file: file.clone(),
                })?
                .text()
                .ok_or_else(|| LoadChunksError::UnsupportedAssetContent { asset: file.clone() })?;

            let mut merged = ConcatSource::new();
            let mut shared = 0;
            for (name, content) in assets.iter() {
                if name == file || !is_style_file(name) || !self.is_common(base_name(name)) {
                    continue;
                }
                let text = content
                    .text()
                    .ok_or_else(|| LoadChunksError::UnsupportedAssetContent { asset: name.clone() })?;

                merged.add(format!(
                    "@import {};",
                    serde_json::Value::String(url_to_request(name))
                ));
                merged.add("\n");
                merged.add(text);
                shared += 1;
            }

            if shared == 0 {
                continue;
            }
            merged.add(original);

            // Write back in the representation the asset already uses
            if let Some(asset) = assets.get_mut(file) {
                *asset = match asset {
                    AssetContent::Source(_) => AssetContent::Source(merged),
                    _ => AssetContent::Value(merged.source()),
                };
            }
            debug!("Merged {} shared stylesheet(s) into '{}'", shared, file);
            rewritten += 1;
        }

        Ok(rewritten)
    }

    fn is_common(&self, name: &str) -> bool {
        self.common_chunks.iter().any(|common| common == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn job(files: &[&str]) -> StyleMergeJob {
        StyleMergeJob {
            chunk: "app".into(),
            files: files.iter().map(|s| s.to_string()).collect(),
            common_chunks: vec!["vendors".into(), "common".into()],
        }
    }

    fn value(text: &str) -> AssetContent {
        AssetContent::Value(text.to_string())
    }

    #[test]
    fn test_merges_shared_stylesheets_in_asset_order() {
        let mut assets = AssetMap::new();
        assets.insert("common.wxss".into(), value(".c{}"));
        assets.insert("app.js".into(), value("App()"));
        assets.insert("vendors.wxss".into(), value(".v{}"));
        assets.insert("app.wxss".into(), value(".app{}"));

        let count = job(&["app.js", "app.wxss"]).run(&mut assets).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            assets["app.wxss"],
            value("@import \"./common.wxss\";\n.c{}@import \"./vendors.wxss\";\n.v{}.app{}")
        );
        assert_eq!(assets["common.wxss"], value(".c{}"));
        assert_eq!(assets["app.js"], value("App()"));
    }

    #[test]
    fn test_keeps_source_representation() {
        let mut assets = AssetMap::new();
        assets.insert("common.wxss".into(), value(".c{}"));
        assets.insert(
            "app.wxss".into(),
            AssetContent::Source(ConcatSource::from(".app{}".to_string())),
        );

        job(&["app.wxss"]).run(&mut assets).unwrap();

        match &assets["app.wxss"] {
            AssetContent::Source(source) => {
                assert_eq!(source.source(), "@import \"./common.wxss\";\n.c{}.app{}")
            }
            other => panic!("expected source content, got {:?}", other),
        }
    }

    #[test]
    fn test_ignores_non_shared_names() {
        let mut assets = AssetMap::new();
        assets.insert("pages/index/index.wxss".into(), value(".p{}"));
        assets.insert("common-ui.wxss".into(), value(".u{}"));
        assets.insert("common.js".into(), value("x"));
        assets.insert("app.wxss".into(), value(".app{}"));

        let count = job(&["app.wxss"]).run(&mut assets).unwrap();

        assert_eq!(count, 0);
        assert_eq!(assets["app.wxss"], value(".app{}"));
    }

    #[test]
    fn test_noop_without_stylesheet_output() {
        let mut assets = AssetMap::new();
        assets.insert("common.wxss".into(), value(".c{}"));
        assets.insert("app.js".into(), value("App()"));

        assert_eq!(job(&["app.js"]).run(&mut assets).unwrap(), 0);
        assert_eq!(assets["app.js"], value("App()"));
    }

    #[test]
    fn test_binary_content_is_fatal() {
        let mut assets = AssetMap::new();
        assets.insert("common.wxss".into(), value(".c{}"));
        assets.insert("app.wxss".into(), AssetContent::Binary(vec![0xff]));

        let err = job(&["app.wxss"]).run(&mut assets).unwrap_err();
        assert!(matches!(err, LoadChunksError::UnsupportedAssetContent { ref asset } if asset == "app.wxss"));
    }

    #[test]
    fn test_missing_entry_asset_is_fatal() {
        let mut assets = AssetMap::new();
        let err = job(&["app.wxss"]).run(&mut assets).unwrap_err();
        assert!(matches!(err, LoadChunksError::MissingAsset { .. }));
    }
}
