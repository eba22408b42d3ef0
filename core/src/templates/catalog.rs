// templar/src/templates/catalog.rs

//! Enumerates installed extensions from an extensions directory.

use crate::templates::types::{Extension, ExtensionManifest};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{event, instrument, Level};

#[async_trait]
pub trait ExtensionCatalog: Send + Sync {
  /// Manifests of every installed extension. With `localize`, `%key%`
  /// placeholders in display names and descriptions are resolved.
  async fn installed_manifests(&self, localize: bool) -> Vec<ExtensionManifest>;

  async fn installed_extensions(&self) -> Vec<Extension> {
    self
      .installed_manifests(false)
      .await
      .iter()
      .map(ExtensionManifest::to_extension)
      .collect()
  }
}

/// Reads `<dir>/<folder>/package.json` for every extension folder, skipping
/// folders marked obsolete in `<dir>/.obsolete`.
#[derive(Debug, Clone)]
pub struct DirectoryExtensionCatalog {
  dir: PathBuf,
}

impl DirectoryExtensionCatalog {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  async fn obsolete_folder_names(&self) -> Option<BTreeSet<String>> {
    let obsolete_path = self.dir.join(".obsolete");
    let text = match tokio::fs::read_to_string(&obsolete_path).await {
      Ok(text) => text,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Some(BTreeSet::new()),
      Err(e) => {
        event!(Level::ERROR, error = %e, path = %obsolete_path.display(), "Can not read obsolete list.");
        return None;
      }
    };

    match serde_json::from_str::<HashMap<String, serde_json::Value>>(&text) {
      Ok(map) => Some(
        map
          .into_iter()
          .filter(|(_, flag)| flag.as_bool() == Some(true))
          .map(|(name, _)| name)
          .collect(),
      ),
      Err(e) => {
        event!(Level::ERROR, error = %e, path = %obsolete_path.display(), "Can not parse obsolete list as JSON.");
        None
      }
    }
  }

  async fn installed_folder_names(&self, obsolete: &BTreeSet<String>) -> Option<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(&self.dir).await {
      Ok(entries) => entries,
      Err(e) => {
        event!(Level::ERROR, error = %e, dir = %self.dir.display(), "Can not read the extensions directory.");
        return None;
      }
    };

    let mut names = Vec::new();
    loop {
      match entries.next_entry().await {
        Ok(Some(entry)) => {
          let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
          let name = entry.file_name().to_string_lossy().into_owned();
          if is_dir && !obsolete.contains(&name) {
            names.push(name);
          }
        }
        Ok(None) => break,
        Err(e) => {
          event!(Level::WARN, error = %e, "Failed to read a directory entry; skipping the rest.");
          break;
        }
      }
    }
    names.sort();
    Some(names)
  }

  async fn read_manifest(folder: &Path, localize: bool) -> Option<ExtensionManifest> {
    let manifest_path = folder.join("package.json");
    let manifest = match load_json::<ExtensionManifest>(&manifest_path).await {
      Ok(manifest) => manifest,
      Err(e) => {
        event!(Level::WARN, error = %e, path = %manifest_path.display(), "Can not parse extension manifest.");
        return None;
      }
    };

    if localize {
      Some(localize_manifest(manifest, folder).await)
    } else {
      Some(manifest)
    }
  }
}

#[async_trait]
impl ExtensionCatalog for DirectoryExtensionCatalog {
  #[instrument(name = "DirectoryExtensionCatalog::installed_manifests", skip(self), fields(dir = %self.dir.display()))]
  async fn installed_manifests(&self, localize: bool) -> Vec<ExtensionManifest> {
    let Some(obsolete) = self.obsolete_folder_names().await else {
      return Vec::new();
    };
    let Some(folders) = self.installed_folder_names(&obsolete).await else {
      return Vec::new();
    };

    let mut manifests = Vec::with_capacity(folders.len());
    for folder in folders {
      if let Some(manifest) = Self::read_manifest(&self.dir.join(folder), localize).await {
        manifests.push(manifest);
      }
    }
    event!(Level::DEBUG, count = manifests.len(), "Installed extensions enumerated.");
    manifests
  }
}

async fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
  let text = tokio::fs::read_to_string(path).await?;
  Ok(serde_json::from_str(&text)?)
}

fn nls_key(value: &str) -> Option<&str> {
  value
    .strip_prefix('%')
    .and_then(|rest| rest.strip_suffix('%'))
}

async fn localize_manifest(mut manifest: ExtensionManifest, folder: &Path) -> ExtensionManifest {
  let needs_nls = [&manifest.display_name, &manifest.description]
    .into_iter()
    .any(|field| field.as_deref().and_then(nls_key).is_some());
  if !needs_nls {
    return manifest;
  }

  let nls_path = folder.join("package.nls.json");
  let nls = match load_json::<HashMap<String, serde_json::Value>>(&nls_path).await {
    Ok(nls) => nls,
    Err(e) => {
      event!(Level::WARN, error = %e, path = %nls_path.display(), "Can not parse localization file.");
      return manifest;
    }
  };

  for field in [&mut manifest.display_name, &mut manifest.description] {
    let localized = field
      .as_deref()
      .and_then(nls_key)
      .and_then(|key| nls.get(key))
      .and_then(|value| value.as_str())
      .filter(|value| !value.is_empty())
      .map(str::to_string);
    if let Some(localized) = localized {
      *field = Some(localized);
    }
  }
  manifest
}
