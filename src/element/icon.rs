use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

/// An icon as written in the configuration, resolved to a file once on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "IconName", into = "IconName")]
pub struct ElementIcon {
    pub name: IconName,
    pub path: Option<PathBuf>,
}

impl From<IconName> for ElementIcon {
    fn from(name: IconName) -> Self {
        let path = find_icon_path(&name);
        if path.is_none() {
            log::debug!("No icon found for '{}'", name);
        }
        Self { name, path }
    }
}

impl From<ElementIcon> for IconName {
    fn from(icon: ElementIcon) -> Self {
        icon.name
    }
}

impl ElementIcon {
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Absolute paths are used as-is; anything else is looked up in the icon theme.
pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_str());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon_name.as_str()).with_size(128).with_scale(1).find()
}
