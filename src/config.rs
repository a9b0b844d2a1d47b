// Copyright 2026 The coursedesk Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

const DEFAULT_CONFIG_FILE: &str = "coursedesk.toml";
const DEFAULT_PORT: u16 = 8000;

/// Program configuration, read from `coursedesk.toml` and overridden by
/// `COURSEDESK_API_URL`, `COURSEDESK_TOKEN`, and `COURSEDESK_PORT`.
///
/// A missing token is tolerated here: every API call checks for one and
/// fails with a clear message, so the error surfaces where it matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Fallible<Config> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    let content = std::fs::read_to_string(&default)?;
                    toml::from_str(&content)?
                } else {
                    Config::default()
                }
            }
        };
        apply_overrides(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn api_url(&self) -> Fallible<&str> {
        match self.api_url.as_deref() {
            Some(url) => Ok(url),
            None => fail("api_url is not configured."),
        }
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("COURSEDESK_API_URL") {
        if !url.is_empty() {
            config.api_url = Some(url);
        }
    }
    if let Some(token) = lookup("COURSEDESK_TOKEN") {
        if !token.is_empty() {
            config.token = Some(token);
        }
    }
    if let Some(port) = lookup("COURSEDESK_PORT") {
        if let Ok(port) = port.parse::<u16>() {
            config.port = Some(port);
        }
    }
}
