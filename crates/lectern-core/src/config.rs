use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

const CONFIG_FILE_NAME: &str =
  "lectern.toml";
const CONFIG_ENV_VAR: &str =
  "LECTERN_CONFIG";
const API_URL_ENV_VAR: &str =
  "LECTERN_API_URL";
const DATA_DIR_ENV_VAR: &str =
  "LECTERN_DATA";

fn default_base_url() -> String {
  "http://localhost:8080/api"
    .to_string()
}

fn default_timeout_secs() -> u64 {
  20
}

fn default_color() -> bool {
  true
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub ui:  UiConfig
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(
    default = "default_timeout_secs"
  )]
  pub timeout_secs: u64
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
  #[serde(default = "default_color")]
  pub color: bool
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url:     default_base_url(),
      timeout_secs:
        default_timeout_secs()
    }
  }
}

impl Default for UiConfig {
  fn default() -> Self {
    Self {
      color: default_color()
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      ui:  UiConfig::default()
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg =
      match resolve_config_path(
        override_path
      ) {
        | Some(path)
          if path.exists() =>
        {
          info!(config = %path.display(), "loading config");
          let raw =
            fs::read_to_string(&path)
              .with_context(|| {
                format!(
                  "failed to read {}",
                  path.display()
                )
              })?;
          toml::from_str::<Config>(
            &raw
          )
          .with_context(|| {
            format!(
              "failed to parse {}",
              path.display()
            )
          })?
        }
        | Some(path) => {
          info!(config = %path.display(), "config file not found; using defaults");
          Config::default()
        }
        | None => {
          warn!(
            "no config location \
             resolved; using defaults"
          );
          Config::default()
        }
      };

    if let Ok(raw) =
      std::env::var(API_URL_ENV_VAR)
    {
      let trimmed = raw.trim();
      if !trimmed.is_empty() {
        debug!(url = %trimmed, "applying api url override");
        cfg.api.base_url =
          trimmed.to_string();
      }
    }

    cfg.sanitize();
    Ok(cfg)
  }

  fn sanitize(&mut self) {
    if self
      .api
      .base_url
      .trim()
      .is_empty()
    {
      self.api.base_url =
        default_base_url();
    }
    while self.api.base_url.ends_with('/')
    {
      self.api.base_url.pop();
    }
    if self.api.timeout_secs == 0 {
      self.api.timeout_secs =
        default_timeout_secs();
    }
  }
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  dirs::config_dir().map(|dir| {
    dir
      .join("lectern")
      .join(CONFIG_FILE_NAME)
  })
}

#[tracing::instrument(skip(
  override_dir
))]
pub fn resolve_data_dir(
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = if let Some(path) =
    override_dir
  {
    path.to_path_buf()
  } else if let Some(env_dir) =
    data_dir_from_env()
  {
    env_dir
  } else {
    dirs::data_dir()
      .ok_or_else(|| {
        anyhow!(
          "cannot determine data \
           directory"
        )
      })?
      .join("lectern")
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

fn data_dir_from_env()
-> Option<PathBuf> {
  let raw = std::env::var(
    DATA_DIR_ENV_VAR
  )
  .ok()?;
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }
  Some(PathBuf::from(trimmed))
}
