//! INI file configuration adapter.
//!
//! One section per strategy name (`[simple]`), plus an optional
//! `[simulation]` section. Section and key names are case-insensitive.

use crate::domain::error::SigdashError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SigdashError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| SigdashError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, SigdashError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| SigdashError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn has_section(&self, section: &str) -> bool {
        let wanted = section.to_lowercase();
        self.config.sections().iter().any(|s| *s == wanted)
    }

    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .filter(|v| !v.trim().is_empty())
    }

    fn get_float(&self, section: &str, key: &str) -> Result<Option<f64>, SigdashError> {
        self.config
            .getfloat(section, key)
            .map_err(|e| SigdashError::invalid(section, key, e))
    }

    fn get_uint(&self, section: &str, key: &str) -> Result<Option<u64>, SigdashError> {
        self.config
            .getuint(section, key)
            .map_err(|e| SigdashError::invalid(section, key, e))
    }
}
