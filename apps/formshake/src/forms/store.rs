//! Filesystem-backed form definitions: `<root>/<form_id>/form.json` and
//! `<root>/<form_id>/<lang>.csv`.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::errors::AppError;
use crate::forms::models::{FormDefinition, Translation};

const FORM_FILE: &str = "form.json";
const TRANSLATION_EXT: &str = "csv";

#[derive(Debug, Clone)]
pub struct FormStore {
    root: PathBuf,
}

/// A form with every translation stored next to it.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub form: FormDefinition,
    pub translations: BTreeMap<String, Translation>,
}

/// Every loadable form under the store root, keyed by form id.
pub type Catalog = BTreeMap<String, CatalogEntry>;

impl FormStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn load_form(&self, form_id: &str) -> Result<FormDefinition, AppError> {
        validate_id("form id", form_id)?;
        let path = self.root.join(form_id).join(FORM_FILE);
        let bytes = read_file(&path, || format!("Form '{form_id}' not found")).await?;
        let form = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(form)
    }

    pub async fn load_translation(
        &self,
        form_id: &str,
        lang_id: &str,
    ) -> Result<Translation, AppError> {
        validate_id("form id", form_id)?;
        validate_id("language", lang_id)?;
        let path = self
            .root
            .join(form_id)
            .join(format!("{lang_id}.{TRANSLATION_EXT}"));
        let bytes = read_file(&path, || {
            format!("No '{lang_id}' translation for form '{form_id}'")
        })
        .await?;
        Ok(parse_translation(&bytes).with_context(|| format!("parsing {}", path.display()))?)
    }

    /// Loads every form directory under the root together with its translations.
    /// Directories without a `form.json` or with an unusable name are skipped.
    pub async fn catalog(&self) -> Result<Catalog, AppError> {
        let mut catalog = Catalog::new();
        let mut dirs = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("listing {}", self.root.display()))?;

        while let Some(dir) = dirs.next_entry().await.context("listing form directories")? {
            let Some(form_id) = dir.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let has_form = tokio::fs::try_exists(dir.path().join(FORM_FILE))
                .await
                .unwrap_or(false);
            if validate_id("form id", &form_id).is_err() || !has_form {
                debug!(dir = %dir.path().display(), "Skipping non-form directory");
                continue;
            }

            let form = self.load_form(&form_id).await?;
            let mut translations = BTreeMap::new();
            for lang_id in self.languages(&dir.path()).await? {
                let translation = self.load_translation(&form_id, &lang_id).await?;
                translations.insert(lang_id, translation);
            }
            catalog.insert(form_id, CatalogEntry { form, translations });
        }

        debug!(forms = catalog.len(), "Form catalog loaded");
        Ok(catalog)
    }

    async fn languages(&self, form_dir: &Path) -> Result<Vec<String>, AppError> {
        let mut languages = Vec::new();
        let mut files = tokio::fs::read_dir(form_dir)
            .await
            .with_context(|| format!("listing {}", form_dir.display()))?;
        while let Some(file) = files.next_entry().await.context("listing translations")? {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TRANSLATION_EXT) {
                continue;
            }
            if let Some(lang_id) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_id("language", lang_id).is_ok() {
                    languages.push(lang_id.to_string());
                }
            }
        }
        Ok(languages)
    }
}

/// Ids become path components: letters, digits, `.`, `_`, `-`, no leading dot.
fn validate_id(kind: &str, id: &str) -> Result<(), AppError> {
    let valid = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("invalid {kind} '{id}'")))
    }
}

/// Headerless two-column CSV: `source,translation` per record.
fn parse_translation(bytes: &[u8]) -> anyhow::Result<Translation> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(bytes);

    let mut translation = Translation::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading record {}", line + 1))?;
        match (record.get(0), record.get(1), record.len()) {
            (Some(source), Some(target), 2) => {
                translation.insert(source.to_string(), target.to_string());
            }
            (_, _, fields) => {
                anyhow::bail!("record {} has {fields} fields, expected 2", line + 1)
            }
        }
    }
    Ok(translation)
}

async fn read_file(path: &Path, not_found: impl FnOnce() -> String) -> Result<Vec<u8>, AppError> {
    debug!(path = %path.display(), "Reading form data");
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::NotFound(not_found())),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("reading {}", path.display()))
            .into()),
    }
}
