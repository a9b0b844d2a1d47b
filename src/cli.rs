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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_course;
use crate::cmd::learn::learn;
use crate::cmd::progress::print_progress;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Open a course in the browser and work through it.
    Learn {
        /// The course to open.
        course_id: String,
        /// Optional path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Port to serve on, overriding the configuration.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print per-item progress for a course.
    Progress {
        /// The course to report on.
        course_id: String,
        /// Optional path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check a course for quizzes that cannot be taken.
    Check {
        /// The course to check.
        course_id: String,
        /// Optional path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Learn {
            course_id,
            config,
            port,
        } => learn(&course_id, config.as_deref(), port).await,
        Command::Progress { course_id, config } => {
            print_progress(&course_id, config.as_deref()).await
        }
        Command::Check { course_id, config } => check_course(&course_id, config.as_deref()).await,
    }
}
