//! Per-voice speech-rate calibration.
//!
//! Seeds are static priors; the timing controller clones the profile for a
//! request and recalibrates the copy from measured audio. Nothing learned
//! during a request is written back to the catalog.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Speech rate assumed for voices with no calibration entry.
pub const DEFAULT_WORDS_PER_MINUTE: f64 = 140.0;
pub const DEFAULT_PAUSE_FACTOR: f64 = 1.0;

const MIN_WPM: f64 = 60.0;
const MAX_WPM: f64 = 260.0;
const MIN_PAUSE_FACTOR: f64 = 0.5;
const MAX_PAUSE_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub voice_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub words_per_minute: f64,
    #[serde(default = "default_pause_factor")]
    pub pause_factor: f64,
}

fn default_pause_factor() -> f64 {
    DEFAULT_PAUSE_FACTOR
}

impl VoiceProfile {
    /// Profile used for voices missing from the catalog.
    #[must_use]
    pub fn fallback(voice_id: &str) -> Self {
        Self {
            voice_id: voice_id.to_string(),
            name: None,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            pause_factor: DEFAULT_PAUSE_FACTOR,
        }
    }

    fn seed(voice_id: &str, name: &str, words_per_minute: f64, pause_factor: f64) -> Self {
        Self {
            voice_id: voice_id.to_string(),
            name: Some(name.to_string()),
            words_per_minute,
            pause_factor,
        }
    }
}

/// Lookup table of voice profiles keyed by voice id.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceCatalog {
    profiles: HashMap<String, VoiceProfile>,
}

impl Default for VoiceCatalog {
    /// Built-in seeds for the stock ElevenLabs voices.
    fn default() -> Self {
        Self::from_profiles(vec![
            VoiceProfile::seed("21m00Tcm4TlvDq8ikWAM", "Rachel", 140.0, 1.0),
            VoiceProfile::seed("2EiwWnXFnvU5JabPnv8n", "Clyde", 135.0, 1.1),
            VoiceProfile::seed("CwhRBWXzGAHq8TQ4Fs17", "Roger", 145.0, 0.9),
            VoiceProfile::seed("EXAVITQu4vr4xnSDxMaL", "Sarah", 138.0, 1.05),
        ])
    }
}

impl VoiceCatalog {
    #[must_use]
    pub fn from_profiles(profiles: Vec<VoiceProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.voice_id.clone(), p))
                .collect(),
        }
    }

    /// Profile for `voice_id`, or the documented default when unknown.
    #[must_use]
    pub fn profile_for(&self, voice_id: &str) -> VoiceProfile {
        self.profiles
            .get(voice_id)
            .cloned()
            .unwrap_or_else(|| VoiceProfile::fallback(voice_id))
    }

    #[must_use]
    pub fn contains(&self, voice_id: &str) -> bool {
        self.profiles.contains_key(voice_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct VoicesFile {
    voices: Vec<VoiceProfile>,
}

/// Load and validate a voice catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_voice_catalog(path: &Path) -> Result<VoiceCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VoicesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_voice_catalog(&content)
}

fn parse_voice_catalog(content: &str) -> Result<VoiceCatalog, ConfigError> {
    let file: VoicesFile = serde_yaml::from_str(content)?;
    validate_voices(&file.voices)?;
    Ok(VoiceCatalog::from_profiles(file.voices))
}

fn validate_voices(voices: &[VoiceProfile]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for voice in voices {
        if voice.voice_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "voice_id must be non-empty".to_string(),
            ));
        }
        if !(MIN_WPM..=MAX_WPM).contains(&voice.words_per_minute) {
            return Err(ConfigError::Validation(format!(
                "voice '{}' has words_per_minute {}; must be within {MIN_WPM}..={MAX_WPM}",
                voice.voice_id, voice.words_per_minute
            )));
        }
        if !(MIN_PAUSE_FACTOR..=MAX_PAUSE_FACTOR).contains(&voice.pause_factor) {
            return Err(ConfigError::Validation(format!(
                "voice '{}' has pause_factor {}; must be within {MIN_PAUSE_FACTOR}..={MAX_PAUSE_FACTOR}",
                voice.voice_id, voice.pause_factor
            )));
        }
        if !seen.insert(voice.voice_id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate voice_id: '{}'",
                voice.voice_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_voice_falls_back_to_default() {
        let catalog = VoiceCatalog::default();
        let profile = catalog.profile_for("nope");
        assert_eq!(profile.voice_id, "nope");
        assert!((profile.words_per_minute - DEFAULT_WORDS_PER_MINUTE).abs() < f64::EPSILON);
        assert!((profile.pause_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn builtin_seed_is_returned() {
        let profile = VoiceCatalog::default().profile_for("2EiwWnXFnvU5JabPnv8n");
        assert_eq!(profile.name.as_deref(), Some("Clyde"));
        assert!((profile.words_per_minute - 135.0).abs() < f64::EPSILON);
        assert!((profile.pause_factor - 1.1).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_yaml_with_default_pause_factor() {
        let yaml = "voices:\n  - voice_id: v1\n    words_per_minute: 130\n";
        let catalog = parse_voice_catalog(yaml).unwrap();
        let profile = catalog.profile_for("v1");
        assert!((profile.words_per_minute - 130.0).abs() < f64::EPSILON);
        assert!((profile.pause_factor - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range_wpm() {
        let yaml = "voices:\n  - voice_id: v1\n    words_per_minute: 20\n";
        assert!(matches!(
            parse_voice_catalog(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let yaml = "voices:\n  - voice_id: v1\n    words_per_minute: 130\n  - voice_id: v1\n    words_per_minute: 140\n";
        let err = parse_voice_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate voice_id"));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voices.yaml");
        std::fs::write(
            &path,
            "voices:\n  - voice_id: v1\n    name: Test\n    words_per_minute: 150\n    pause_factor: 0.9\n",
        )
        .unwrap();
        let catalog = load_voice_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("v1"));
    }

    #[test]
    fn shipped_voices_file_matches_builtin_seeds() {
        let catalog = parse_voice_catalog(include_str!("../../../config/voices.yaml")).unwrap();
        assert_eq!(catalog, VoiceCatalog::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_voice_catalog(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::VoicesFileIo { .. }));
    }
}
