// Copyright 2025 eraflo
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

// Wiring demo: a tiny greeting service wired by the default injector.
// Run with: RUST_LOG=debug cargo run -p wiring-demo

mod app;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use wiring::ScanConfig;

#[derive(Parser, Debug)]
#[command(version, about = "Scans the demo components and greets a few visitors")]
struct Args {
    /// Module path to scan; overrides the configuration file.
    #[arg(long)]
    scope: Option<String>,

    /// Scan configuration to load.
    #[arg(long, default_value = ScanConfig::FILE_NAME)]
    config: PathBuf,

    /// Visitors to greet.
    #[arg(default_values_t = [String::from("Ada"), String::from("Grace")])]
    visitors: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = ScanConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(scope) = args.scope {
        config.scope = scope;
    }
    if config.scope.is_empty() {
        config.scope = app::SCOPE.to_owned();
    }

    wiring::injector()
        .scan_with(wiring::TypeKey::of::<wiring::Component>(), &config)
        .context("wiring the demo components")?;

    for key in wiring::injector().construction_order() {
        log::info!("  built {key}");
    }

    let desk = wiring::retrieve::<app::FrontDesk>()?;
    for visitor in &args.visitors {
        let session: app::Session = wiring::inject()?;
        println!("{}", session.welcome(visitor));
    }
    println!("{}", desk.summary());

    Ok(())
}
