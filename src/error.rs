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

use thiserror::Error;

use crate::api::ApiError;

pub type Fallible<T> = Result<T, ErrorReport>;

#[derive(Debug, Error)]
pub enum ErrorReport {
    #[error("error: {0}")]
    Message(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ErrorReport {
    pub fn new(message: &str) -> Self {
        ErrorReport::Message(message.to_string())
    }
}

/// Shorthand for returning an ad-hoc error message.
pub fn fail<T>(message: &str) -> Fallible<T> {
    Err(ErrorReport::new(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_message() {
        let result: Fallible<()> = fail("token is not configured.");
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: token is not configured.");
    }
}
