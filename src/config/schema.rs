//! Configuration schema definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target platform the bundle is built for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildAdapter {
    #[default]
    Weapp,
    Swan,
    Alipay,
    Tt,
    Qq,
    Jd,
    H5,
    Rn,
    /// Quick apps load pages and components without the app entry, so each
    /// of them pulls in shared chunks itself
    Quickapp,
}

impl BuildAdapter {
    pub fn is_quick_app(&self) -> bool {
        matches!(self, BuildAdapter::Quickapp)
    }
}

impl fmt::Display for BuildAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildAdapter::Weapp => "weapp",
            BuildAdapter::Swan => "swan",
            BuildAdapter::Alipay => "alipay",
            BuildAdapter::Tt => "tt",
            BuildAdapter::Qq => "qq",
            BuildAdapter::Jd => "jd",
            BuildAdapter::H5 => "h5",
            BuildAdapter::Rn => "rn",
            BuildAdapter::Quickapp => "quickapp",
        };
        f.write_str(name)
    }
}

pub(crate) fn default_components_library() -> String {
    "@tarojs/components".to_string()
}

pub(crate) fn default_framework() -> String {
    "react".to_string()
}
