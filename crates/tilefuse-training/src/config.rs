use std::{collections::BTreeMap, path::PathBuf, str::FromStr};

/// Failure while parsing agent configuration tokens.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("configuration token `{token}` is missing `=`")]
    MissingSeparator { token: String },
    #[display("configuration key `{key}` has invalid value `{value}`")]
    InvalidValue { key: String, value: String },
}

/// Weight-initialization scheme for a learning agent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InitScheme {
    /// All weights start at zero.
    #[default]
    Zero,
    /// Weights start as Gaussian noise with the given standard deviation.
    Normal { sigma: f32 },
}

impl FromStr for InitScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidValue {
            key: "init".to_owned(),
            value: s.to_owned(),
        };
        if s == "zero" {
            return Ok(Self::Zero);
        }
        if let Some(sigma) = s.strip_prefix("normal:") {
            let sigma: f32 = sigma.parse().map_err(|_| invalid())?;
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(invalid());
            }
            return Ok(Self::Normal { sigma });
        }
        Err(invalid())
    }
}

/// Typed agent configuration.
///
/// Agents are configured from whitespace-separated `key=value` tokens. The
/// recognized keys map onto named fields with explicit defaults; everything
/// else lands in [`AgentConfig::extra`], retained but otherwise unused. The
/// whole string is parsed once at construction, and [`Agent::notify`]
/// re-applies a single token later.
///
/// [`Agent::notify`]: crate::agent::Agent::notify
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Display name reported by [`Agent::name`](crate::agent::Agent::name).
    pub name: Option<String>,
    /// Role marker (`player` or `environment`); informational only, the
    /// concrete agent type decides its actual role.
    pub role: Option<String>,
    /// Seed for the agent's random stream. Only non-learning stochastic
    /// choices consume randomness.
    pub seed: Option<u64>,
    /// Learning rate. Zero disables learning entirely.
    pub alpha: f32,
    /// Weight-initialization scheme applied before any load.
    pub init: InitScheme,
    /// Weight file restored at construction.
    pub load: Option<PathBuf>,
    /// Weight file written when the owner asks the agent to save.
    pub save: Option<PathBuf>,
    /// n-step TD horizon.
    pub n_step: usize,
    /// Unrecognized keys, kept verbatim.
    pub extra: BTreeMap<String, String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: None,
            role: None,
            seed: None,
            alpha: 0.0,
            init: InitScheme::Zero,
            load: None,
            save: None,
            n_step: 1,
            extra: BTreeMap::new(),
        }
    }
}

impl AgentConfig {
    /// Parses a whitespace-separated `key=value` token string.
    pub fn parse(args: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for token in args.split_whitespace() {
            config.apply_token(token)?;
        }
        Ok(config)
    }

    /// Applies one `key=value` token, overwriting the previous value.
    pub fn apply_token(&mut self, token: &str) -> Result<(), ConfigError> {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| ConfigError::MissingSeparator {
                token: token.to_owned(),
            })?;
        match key {
            "name" => self.name = Some(value.to_owned()),
            "role" => self.role = Some(value.to_owned()),
            "seed" => self.seed = Some(parse_value(key, value)?),
            "alpha" => self.alpha = parse_value(key, value)?,
            "init" => self.init = value.parse()?,
            "load" => self.load = Some(PathBuf::from(value)),
            "save" => self.save = Some(PathBuf::from(value)),
            "n" => {
                let n_step: usize = parse_value(key, value)?;
                if n_step == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_owned(),
                        value: value.to_owned(),
                    });
                }
                self.n_step = n_step;
            }
            _ => {
                self.extra.insert(key.to_owned(), value.to_owned());
            }
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
{
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}
