//! Settings file handling.
//!
//! The file is always written whole through a sibling `.toml.tmp` that is
//! renamed into place. [`ConfigManager::update_section`] re-reads the file
//! and swaps a single table with `toml_edit`, so hand edits elsewhere
//! survive. On load, a file with unknown tables or missing keys is
//! rewritten in canonical form.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot access settings file: {0}")]
    Read(#[from] io::Error),

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("settings file is not valid TOML: {0}")]
    EditParse(#[from] toml_edit::TomlError),

    #[error("no settings file at {0}")]
    NotFound(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A settings file on disk and its parsed contents.
pub struct ConfigManager {
    path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Nothing is read until `load` or `load_or_create`.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Changes stay in memory until `save` or `update_section`.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    pub fn load(&mut self) -> ConfigResult<()> {
        let text = self.read_existing()?.ok_or_else(|| ConfigError::NotFound(self.path.clone()))?;
        self.settings = toml::from_str(&text)?;
        Ok(())
    }

    /// Like `load`, but a missing file is created with defaults and an
    /// incomplete one is rewritten.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        let Some(text) = self.read_existing()? else {
            self.settings = Settings::default();
            self.save()?;
            tracing::info!("Wrote default settings to {}", self.path.display());
            return Ok(());
        };

        self.settings = toml::from_str(&text)?;
        if needs_rewrite(&text, &self.settings)? {
            tracing::debug!("Normalising {}", self.path.display());
            self.save()?;
        }
        Ok(())
    }

    pub fn save(&self) -> ConfigResult<()> {
        let mut text = String::from(
            "# vidcat configuration\n# Command-line flags override these values for a single run.\n",
        );
        for section in ConfigSection::ALL {
            text.push_str(&format!("\n# {}\n[{}]\n", section.comment(), section.table_name()));
            text.push_str(&self.table_text(section)?);
            if !text.ends_with('\n') {
                text.push('\n');
            }
        }
        write_atomically(&self.path, &text)?;
        Ok(())
    }

    /// Write one table from memory, leaving the rest of the file as it is.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let mut doc = match self.read_existing()? {
            Some(text) if !text.trim().is_empty() => text.parse::<DocumentMut>()?,
            _ => DocumentMut::new(),
        };

        let table: DocumentMut = self.table_text(section)?.parse()?;
        doc[section.table_name()] = Item::Table(table.as_table().clone());

        write_atomically(&self.path, &doc.to_string())?;
        Ok(())
    }

    fn read_existing(&self) -> ConfigResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn table_text(&self, section: ConfigSection) -> ConfigResult<String> {
        let s = &self.settings;
        Ok(match section {
            ConfigSection::Paths => toml::to_string_pretty(&s.paths)?,
            ConfigSection::Logging => toml::to_string_pretty(&s.logging)?,
            ConfigSection::Encode => toml::to_string_pretty(&s.encode)?,
            ConfigSection::Timestamps => toml::to_string_pretty(&s.timestamps)?,
            ConfigSection::Discovery => toml::to_string_pretty(&s.discovery)?,
            ConfigSection::Publish => toml::to_string_pretty(&s.publish)?,
            ConfigSection::Tools => toml::to_string_pretty(&s.tools)?,
        })
    }
}

/// True if `text` has tables we don't know or lacks keys `settings` would write.
fn needs_rewrite(text: &str, settings: &Settings) -> ConfigResult<bool> {
    let on_disk: DocumentMut = text.parse()?;
    let canonical: DocumentMut = toml::to_string_pretty(settings)?.parse()?;

    if on_disk.iter().any(|(name, _)| !canonical.contains_key(name)) {
        return Ok(true);
    }

    let missing_key = canonical.iter().any(|(name, item)| {
        let Some(expected) = item.as_table() else {
            return false;
        };
        match on_disk.get(name).and_then(Item::as_table) {
            Some(actual) => expected.iter().any(|(key, _)| !actual.contains_key(key)),
            None => true,
        }
    });
    Ok(missing_key)
}

fn write_atomically(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let staging = path.with_extension("toml.tmp");
    let mut file = fs::File::create(&staging)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&staging, path)
}
