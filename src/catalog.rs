//! Template catalog handling.
//! Loads `pmake-info.json` (or its YAML variants) from the resources directory,
//! resolves a project selection against it and builds the preprocessing context.

use crate::constants::{
    CATALOG_FILES, DEFAULT_LANGUAGE, DEFAULT_PROJECT_NAME, VAR_FEATURES, VAR_KIND, VAR_LANGUAGE,
    VAR_MODE, VAR_STANDARD,
};
use crate::error::{Error, Result};
use crate::preprocessor::Context;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;

/// Every language, standard, kind and mode pmake can generate.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub wildcards: Wildcards,
    pub languages: IndexMap<String, Language>,
}

/// Placeholders replaced verbatim in file names and contents.
#[derive(Debug, Clone, Deserialize)]
pub struct Wildcards {
    pub name: String,
    pub language: String,
    pub standard: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    /// The first entry is the default standard
    pub standards: Vec<String>,
    /// Project kinds keyed by name; the first entry is the default kind
    pub templates: IndexMap<String, Kind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Kind {
    /// The first entry is the default mode
    pub modes: IndexMap<String, Mode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mode {
    #[serde(default)]
    pub features: Features,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Features {
    /// Selected when the user does not pass `--features`
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl Mode {
    /// Whether `feature` is listed as required or optional for this mode.
    pub fn offers(&self, feature: &str) -> bool {
        let Features { required, optional } = &self.features;
        required.iter().chain(optional).any(|offered| offered == feature)
    }
}

impl Catalog {
    fn language(&self, language: &str) -> Result<&Language> {
        self.languages.get(language).ok_or_else(|| {
            Error::CatalogError(format!(
                "Language \"{language}\" is not available (available: [{}])",
                join_keys(&self.languages)
            ))
        })
    }
}

impl Language {
    fn kind(&self, kind: &str, language: &str) -> Result<&Kind> {
        self.templates.get(kind).ok_or_else(|| {
            Error::CatalogError(format!(
                "Kind \"{kind}\" is not available for {language} (available: [{}])",
                join_keys(&self.templates)
            ))
        })
    }
}

impl Kind {
    fn mode(&self, mode: &str, kind: &str, language: &str) -> Result<&Mode> {
        self.modes.get(mode).ok_or_else(|| {
            Error::CatalogError(format!(
                "Template kind \"{kind}\" in mode \"{mode}\" is not available for {language} (available: [{}])",
                join_keys(&self.modes)
            ))
        })
    }
}

fn join_keys<V>(map: &IndexMap<String, V>) -> String {
    map.keys().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Loads the catalog from a resources directory, trying each of [`CATALOG_FILES`].
///
/// # Errors
/// * `Error::CatalogError` if no catalog file exists or it does not match the schema
/// * `Error::IoError` if the file exists but cannot be read
pub fn load_catalog<P: AsRef<Path>>(resources_dir: P) -> Result<Catalog> {
    for file in CATALOG_FILES {
        let catalog_path = resources_dir.as_ref().join(file);
        if catalog_path.exists() {
            debug!("Loading catalog from {}", catalog_path.display());
            let content = std::fs::read_to_string(&catalog_path)
                .map_err(|e| Error::io(&catalog_path, e))?;
            return parse_catalog(&content, file.ends_with(".json"));
        }
    }

    Err(Error::CatalogError(format!(
        "No catalog found in {} (tried: {})",
        resources_dir.as_ref().display(),
        CATALOG_FILES.join(", ")
    )))
}

/// Parses catalog content as JSON or YAML.
pub fn parse_catalog(content: &str, json: bool) -> Result<Catalog> {
    if json {
        serde_json::from_str(content)
            .map_err(|e| Error::CatalogError(format!("Invalid catalog: {e}")))
    } else {
        serde_yaml::from_str(content)
            .map_err(|e| Error::CatalogError(format!("Invalid catalog: {e}")))
    }
}

/// What the user asked for; unset fields fall back to catalog defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub name: Option<String>,
    pub language: Option<String>,
    pub standard: Option<String>,
    pub kind: Option<String>,
    pub mode: Option<String>,
    pub features: Option<Vec<String>>,
}

/// A fully resolved project, validated against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    pub name: String,
    pub language: String,
    pub standard: String,
    pub kind: String,
    pub mode: String,
    pub features: Vec<String>,
    /// Catalog wildcard string -> replacement, in name, language, standard order
    pub wildcards: IndexMap<String, String>,
}

impl ProjectSettings {
    /// Resolves `selection` against `catalog`, filling in defaults.
    ///
    /// # Errors
    /// * `Error::CatalogError` if the language, standard, kind or mode is not in the catalog
    pub fn configure(selection: Selection, catalog: &Catalog) -> Result<Self> {
        let name = selection.name.unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
        let language = selection.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let language_entry = catalog.language(&language)?;

        let standard = match selection.standard {
            Some(standard) => standard,
            None => first(&language_entry.standards, "standards", &language)?,
        };
        let kind = match selection.kind {
            Some(kind) => kind,
            None => first_key(&language_entry.templates, "kinds", &language)?,
        };
        let kind_entry = language_entry.kind(&kind, &language)?;
        let mode = match selection.mode {
            Some(mode) => mode,
            None => first_key(&kind_entry.modes, "modes", &kind)?,
        };
        let mode_entry = kind_entry.mode(&mode, &kind, &language)?;
        let features = match selection.features {
            Some(features) => features,
            None => mode_entry.features.required.clone(),
        };
        for feature in features.iter().filter(|feature| !mode_entry.offers(feature)) {
            warn!("Feature \"{feature}\" is not offered by {kind} ({mode}).");
        }

        let mut wildcards = IndexMap::new();
        wildcards.insert(catalog.wildcards.name.clone(), name.clone());
        wildcards.insert(catalog.wildcards.language.clone(), language.clone());
        wildcards.insert(catalog.wildcards.standard.clone(), standard.clone());

        let project = Self { name, language, standard, kind, mode, features, wildcards };
        project.sanitize(catalog)?;
        Ok(project)
    }

    /// Checks that the language, standard, kind and mode exist in the catalog.
    pub fn sanitize(&self, catalog: &Catalog) -> Result<()> {
        let language = catalog.language(&self.language)?;
        if !language.standards.contains(&self.standard) {
            return Err(Error::CatalogError(format!(
                "Standard \"{}\" is not available for {} (available: [{}])",
                self.standard,
                self.language,
                language.standards.join(",")
            )));
        }
        language
            .kind(&self.kind, &self.language)?
            .mode(&self.mode, &self.kind, &self.language)?;
        Ok(())
    }

    /// Variables every template of this project is preprocessed with.
    pub fn context(&self) -> Context {
        Context::builder()
            .scalar(VAR_LANGUAGE, self.language.as_str())
            .scalar(VAR_STANDARD, self.standard.as_str())
            .scalar(VAR_KIND, self.kind.as_str())
            .scalar(VAR_MODE, self.mode.as_str())
            .list(VAR_FEATURES, self.features.iter().map(String::as_str))
            .build()
    }
}

fn first(values: &[String], what: &str, owner: &str) -> Result<String> {
    values
        .first()
        .cloned()
        .ok_or_else(|| Error::CatalogError(format!("\"{owner}\" has no {what}")))
}

fn first_key<V>(map: &IndexMap<String, V>, what: &str, owner: &str) -> Result<String> {
    map.keys()
        .next()
        .cloned()
        .ok_or_else(|| Error::CatalogError(format!("\"{owner}\" has no {what}")))
}
