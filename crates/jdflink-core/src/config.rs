// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Protocol constants and client configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JdfError, Result};

/// JDF/JMF version written on every envelope unless overridden.
pub const DEFAULT_JDF_VERSION: f64 = 1.4;

/// Interoperability conformance level advertised on JMF envelopes.
pub const ICS_VERSIONS: &str = "Base_L2-1.4";

/// Default namespace of JDF and JMF documents.
pub const JDF_NAMESPACE: &str = "http://www.CIP4.org/JDFSchema_1_1";

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace of Caldera print-configuration extensions.
pub const CALDERA_NAMESPACE: &str = "http://www.caldera.com/jdf";

/// Prefix bound to [`CALDERA_NAMESPACE`].
pub const CALDERA_PREFIX: &str = "caldera";

const CONFIG_FILE: &str = "config.json";

/// Settings for talking to a Nexio controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// JMF endpoint of the controller.
    pub endpoint: String,
    /// `SenderID` written on outbound envelopes.
    pub sender_id: String,
    /// JMF `version` written on outbound envelopes.
    pub protocol_version: f64,
    /// Where the controller should post asynchronous signals, if anywhere.
    pub response_url: Option<String>,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4080/jmf".into(),
            sender_id: "jdflink".into(),
            protocol_version: DEFAULT_JDF_VERSION,
            response_url: None,
            connect_timeout_secs: 10,
            read_timeout_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Read a configuration file.  Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file, or the defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write this configuration as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(JdfError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.sender_id.trim().is_empty() {
            return Err(JdfError::Config("sender_id must not be empty".into()));
        }
        Ok(())
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    config_dir().join("jdflink").join(CONFIG_FILE)
}

fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    PathBuf::from(".")
}
