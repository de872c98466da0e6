use std::env;

use thiserror::Error;

/// Presigned URLs signed with SigV4 cannot outlive seven days.
const MAX_SIGNED_URL_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// How `POST /upload` gets photo bytes into the bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadMode {
    /// The request body carries the photo and the function writes it.
    #[default]
    Direct,
    /// The function hands back a PUT URL and the client uploads itself.
    Presigned,
}

impl UploadMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "presigned" => Ok(Self::Presigned),
            other => Err(ConfigError::Invalid {
                name: "UPLOAD_MODE",
                reason: format!("expected `direct` or `presigned`, got `{other}`"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bucket: String,
    pub region: String,
    pub signed_url_ttl_secs: u64,
    pub auth_key: String,
    pub upload_mode: UploadMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Every required value is
    /// checked here so a bad deployment fails before serving a request.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let bucket = required("S3_BUCKET")?;
        let region = required("S3_REGION")?;
        let ttl = required("SIGNED_URL_EXPIRATION")?;
        let auth_key = required("AUTH_KEY")?;

        let signed_url_ttl_secs = match ttl.trim().parse::<u64>() {
            Ok(secs) if secs > 0 && secs <= MAX_SIGNED_URL_TTL_SECS => secs,
            Ok(secs) => {
                return Err(ConfigError::Invalid {
                    name: "SIGNED_URL_EXPIRATION",
                    reason: format!("{secs} is outside 1..={MAX_SIGNED_URL_TTL_SECS} seconds"),
                })
            }
            Err(e) => {
                return Err(ConfigError::Invalid {
                    name: "SIGNED_URL_EXPIRATION",
                    reason: e.to_string(),
                })
            }
        };

        let upload_mode = match lookup("UPLOAD_MODE") {
            Some(value) if !value.is_empty() => UploadMode::parse(&value)?,
            _ => UploadMode::default(),
        };

        Ok(Self {
            bucket,
            region,
            signed_url_ttl_secs,
            auth_key,
            upload_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const BASE: [(&str, &str); 4] = [
        ("S3_BUCKET", "photos"),
        ("S3_REGION", "ap-northeast-1"),
        ("SIGNED_URL_EXPIRATION", "300"),
        ("AUTH_KEY", "secret"),
    ];

    #[test]
    fn reads_all_required_values() {
        let config = Config::from_lookup(lookup_from(&BASE)).unwrap();
        assert_eq!(
            config,
            Config {
                bucket: "photos".into(),
                region: "ap-northeast-1".into(),
                signed_url_ttl_secs: 300,
                auth_key: "secret".into(),
                upload_mode: UploadMode::Direct,
            }
        );
    }

    #[test]
    fn missing_value_is_rejected() {
        for skipped in ["S3_BUCKET", "S3_REGION", "SIGNED_URL_EXPIRATION", "AUTH_KEY"] {
            let pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != skipped).collect();
            assert_eq!(
                Config::from_lookup(lookup_from(&pairs)),
                Err(ConfigError::Missing(skipped))
            );
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut pairs = BASE.to_vec();
        pairs[3] = ("AUTH_KEY", "");
        assert_eq!(
            Config::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Missing("AUTH_KEY"))
        );
    }

    #[test]
    fn ttl_must_be_a_positive_bounded_integer() {
        for bad in ["abc", "0", "-5", "604801"] {
            let mut pairs = BASE.to_vec();
            pairs[2] = ("SIGNED_URL_EXPIRATION", bad);
            assert!(matches!(
                Config::from_lookup(lookup_from(&pairs)),
                Err(ConfigError::Invalid { name: "SIGNED_URL_EXPIRATION", .. })
            ));
        }
    }

    #[test]
    fn upload_mode_is_selectable() {
        let mut pairs = BASE.to_vec();
        pairs.push(("UPLOAD_MODE", "Presigned"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.upload_mode, UploadMode::Presigned);

        let mut pairs = BASE.to_vec();
        pairs.push(("UPLOAD_MODE", "multipart"));
        assert!(matches!(
            Config::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid { name: "UPLOAD_MODE", .. })
        ));
    }
}
