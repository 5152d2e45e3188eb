//! Runtime configuration: defaults with environment overrides.

use invite_media::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_WIDTH, NormalizeOptions};

/// Default signature pad size (the RSVP form's pad is full width, 12rem tall).
const DEFAULT_PAD_WIDTH: u32 = 600;
const DEFAULT_PAD_HEIGHT: u32 = 192;

/// Runtime configuration populated from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteConfig {
    pub max_width: u32,
    pub jpeg_quality: f32,
    pub pad_width: u32,
    pub pad_height: u32,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            pad_width: DEFAULT_PAD_WIDTH,
            pad_height: DEFAULT_PAD_HEIGHT,
        }
    }
}

impl InviteConfig {
    /// Load from process environment variables.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `get` to look up each variable. Unset keys keep defaults;
    /// set but invalid keys are an error.
    pub fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for key in ["INVITE_MAX_WIDTH", "INVITE_JPEG_QUALITY", "INVITE_PAD_WIDTH", "INVITE_PAD_HEIGHT"] {
            let Some(value) = get(key) else { continue };
            validate_setting(key, &value).map_err(|e| anyhow::anyhow!("{key}: {e}"))?;
            match key {
                "INVITE_MAX_WIDTH" => config.max_width = value.trim().parse()?,
                "INVITE_JPEG_QUALITY" => config.jpeg_quality = value.trim().parse()?,
                "INVITE_PAD_WIDTH" => config.pad_width = value.trim().parse()?,
                "INVITE_PAD_HEIGHT" => config.pad_height = value.trim().parse()?,
                _ => unreachable!("key list and match arms are in sync"),
            }
        }

        Ok(config)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            max_width: self.max_width,
            quality: self.jpeg_quality,
        }
    }
}

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    let value = value.trim();
    match key {
        "INVITE_MAX_WIDTH" | "INVITE_PAD_WIDTH" | "INVITE_PAD_HEIGHT" => {
            let v: u32 = value.parse().map_err(|_| "must be a positive integer")?;
            if !(1..=invite_media::surface::MAX_SURFACE_EDGE).contains(&v) {
                return Err(format!(
                    "must be between 1 and {}",
                    invite_media::surface::MAX_SURFACE_EDGE
                ));
            }
        }
        "INVITE_JPEG_QUALITY" => {
            let v: f32 = value.parse().map_err(|_| "must be a float")?;
            if !(v > 0.0 && v <= 1.0) {
                return Err("must be greater than 0.0 and at most 1.0".into());
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = InviteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, InviteConfig::default());
        assert_eq!(config.max_width, 800);
        assert_eq!(config.jpeg_quality, 0.7);
    }

    #[test]
    fn env_overrides_apply() {
        let config = InviteConfig::from_lookup(lookup(&[
            ("INVITE_MAX_WIDTH", "1024"),
            ("INVITE_JPEG_QUALITY", " 0.85 "),
            ("INVITE_PAD_HEIGHT", "300"),
        ]))
        .unwrap();
        assert_eq!(config.max_width, 1024);
        assert_eq!(config.jpeg_quality, 0.85);
        assert_eq!(config.pad_width, 600);
        assert_eq!(config.pad_height, 300);
        assert_eq!(config.normalize_options().max_width, 1024);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(InviteConfig::from_lookup(lookup(&[("INVITE_MAX_WIDTH", "0")])).is_err());
        assert!(InviteConfig::from_lookup(lookup(&[("INVITE_MAX_WIDTH", "wide")])).is_err());
        assert!(InviteConfig::from_lookup(lookup(&[("INVITE_JPEG_QUALITY", "0")])).is_err());
        assert!(InviteConfig::from_lookup(lookup(&[("INVITE_JPEG_QUALITY", "1.5")])).is_err());
    }

    #[test]
    fn validate_setting_ignores_unknown_keys() {
        assert!(validate_setting("SOMETHING_ELSE", "whatever").is_ok());
    }
}
