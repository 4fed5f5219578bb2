use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vault_core::crypto::KdfParams;
use vault_core::{AssessmentTemplate, Question, StaticTemplates};

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultConfig {
    pub vault: VaultSection,
    #[serde(default)]
    pub kdf: KdfSection,
    #[serde(default)]
    pub templates: Vec<AssessmentTemplate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultSection {
    pub owner_id: String,
    pub store_path: String,
}

/// Argon2id cost. Changing it after records exist makes them unreadable.
#[derive(Debug, Serialize, Deserialize)]
pub struct KdfSection {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfSection {
    fn default() -> Self {
        let params = KdfParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

impl VaultConfig {
    pub fn new(owner_id: String, store_path: PathBuf) -> Self {
        Self {
            vault: VaultSection {
                owner_id,
                store_path: store_path.to_string_lossy().to_string(),
            },
            kdf: KdfSection::default(),
            templates: starter_templates(),
        }
    }

    pub fn kdf_params(&self) -> anyhow::Result<KdfParams> {
        KdfParams::new(
            self.kdf.memory_kib,
            self.kdf.iterations,
            self.kdf.parallelism,
        )
        .map_err(|e| anyhow::anyhow!("Invalid [kdf] section: {}", e))
    }

    pub fn template_source(&self) -> StaticTemplates {
        self.templates.iter().cloned().collect()
    }
}

/// Template written by `vault init` so assessments work out of the box.
fn starter_templates() -> Vec<AssessmentTemplate> {
    vec![AssessmentTemplate::new("daily-checkin", "Daily check-in")
        .with_question(Question::scale("mood", "How is your mood today?", 1, 5))
        .with_question(Question::scale("energy", "How is your energy level?", 1, 5))
        .with_question(Question::free_text(
            "gratitude",
            "What is one thing you are grateful for?",
        ))]
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("records.sqlite"))
}

pub fn read_config(path: &Path) -> anyhow::Result<VaultConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &VaultConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vault"));
        }
    }
    Ok(home_dir()?.join(".config").join("vault"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vault"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("vault"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vault_core::{AnswerType, TemplateSource};

    #[test]
    fn test_config_round_trips_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = VaultConfig::new("owner-1".into(), dir.path().join("records.sqlite"));

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();

        assert_eq!(loaded.vault.owner_id, "owner-1");
        assert_eq!(loaded.templates, config.templates);
        assert_eq!(loaded.kdf_params().unwrap(), KdfParams::default());
    }

    #[test]
    fn test_parse_handwritten_config() {
        let toml = r#"
[vault]
owner_id = "u1"
store_path = "/tmp/records.sqlite"

[kdf]
memory_kib = 8
iterations = 1
parallelism = 1

[[templates]]
id = "weekly"
title = "Weekly review"

[[templates.questions]]
id = "mood"
text = "Mood?"
answer_type = { type = "scale", min = 1, max = 10 }

[[templates.questions]]
id = "notes"
text = "Notes"
answer_type = { type = "free_text" }
"#;
        let config: VaultConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.kdf_params().unwrap(), KdfParams::new(8, 1, 1).unwrap());
        let template = config.template_source().template("weekly").unwrap();
        assert_eq!(template.questions.len(), 2);
        assert_eq!(
            template.questions[0].answer_type,
            AnswerType::Scale { min: 1, max: 10 }
        );
    }

    #[test]
    fn test_missing_kdf_section_uses_defaults() {
        let toml = "[vault]\nowner_id = \"u1\"\nstore_path = \"x\"\n";
        let config: VaultConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.kdf_params().unwrap(), KdfParams::default());
        assert!(config.templates.is_empty());
    }

    #[test]
    fn test_invalid_kdf_section_is_rejected() {
        let toml = "[vault]\nowner_id = \"u1\"\nstore_path = \"x\"\n\n[kdf]\nmemory_kib = 1\niterations = 0\nparallelism = 1\n";
        let config: VaultConfig = toml::from_str(toml).unwrap();
        assert!(config.kdf_params().is_err());
    }
}
