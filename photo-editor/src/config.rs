use anyhow::{Context, Result, bail};
use log::debug;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

const APP_NAME: &str = "photo-editor";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(default)]
    pub preference: Preference,

    #[serde(default)]
    pub brush: Brush,

    #[serde(default)]
    pub frame: Frame,

    #[serde(default)]
    pub background: Background,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Preference {
    /// Filter applied when `apply` gets no `--filter`
    #[derivative(Default(value = "\"none\".to_string()"))]
    pub default_filter: String,

    #[derivative(Default(value = "160"))]
    pub preview_edge: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Brush {
    #[derivative(Default(value = "\"000000\".to_string()"))]
    pub color: String,

    #[derivative(Default(value = "10.0"))]
    pub size: f32,

    #[derivative(Default(value = "1.0"))]
    pub opacity: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Frame {
    /// Frame every photo even without `--frame`
    pub enabled: bool,

    #[derivative(Default(value = "\"solid\".to_string()"))]
    pub style: String,

    #[derivative(Default(value = "24"))]
    pub border: u32,

    #[derivative(Default(value = "\"FFFFFF\".to_string()"))]
    pub color: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Background {
    #[derivative(Default(value = "40.0"))]
    pub tolerance: f32,
}

impl Config {
    /// Loads the config from `path`, or from the platform config directory
    /// when no path is given. A missing or unreadable file is replaced with
    /// the defaults.
    pub fn init(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => {
                let app_dirs = AppDirs::new(Some(APP_NAME), true)
                    .with_context(|| "locate config directory failed")?;
                app_dirs.config_dir.join(format!("{APP_NAME}.toml"))
            }
        };

        if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create config directory {} failed", dir.display()))?;
        }

        let mut config = Config {
            config_path,
            ..Default::default()
        };
        config.load().with_context(|| "load config file failed")?;
        debug!("{:?}", config);

        Ok(config)
    }

    fn load(&mut self) -> Result<()> {
        match fs::read_to_string(&self.config_path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(mut c) => {
                    c.config_path = self.config_path.clone();
                    c.is_first_run = self.is_first_run;
                    *self = c;

                    Ok(())
                }
                Err(e) => {
                    log::warn!(
                        "parse {} failed, restoring defaults: {e}",
                        self.config_path.display()
                    );
                    self.is_first_run = true;

                    let mut bak_file = self.config_path.clone().into_os_string();
                    bak_file.push(".bak");
                    _ = fs::copy(&self.config_path, bak_file);

                    self.save()
                }
            },
            Err(_) => {
                self.is_first_run = true;
                self.save()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| "save config failed".to_string())?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }
}
