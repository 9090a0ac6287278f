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

//! Demo components.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use wiring::{BoxError, Component, Dependencies, Injectable, TypeKey};

/// Where the demo components live.
pub const SCOPE: &str = module_path!();

#[derive(Component)]
pub struct Clock;

impl Clock {
    pub fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

#[derive(Component)]
pub struct Counter {
    #[component(default)]
    visits: AtomicU64,
}

impl Counter {
    pub fn bump(&self) -> u64 {
        self.visits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total(&self) -> u64 {
        self.visits.load(Ordering::Relaxed)
    }
}

#[derive(Component)]
pub struct Greeter {
    clock: Arc<Clock>,
}

impl Greeter {
    pub fn greet(&self, name: &str) -> String {
        format!("Hello, {name}! (t={})", self.clock.now_secs())
    }
}

#[derive(Component)]
pub struct FrontDesk {
    greeter: Arc<Greeter>,
    counter: Arc<Counter>,
}

impl FrontDesk {
    pub fn summary(&self) -> String {
        format!("{} visitor(s) greeted", self.counter.total())
    }
}

/// One visit; injected fresh for every visitor.
pub struct Session {
    desk: Arc<FrontDesk>,
    number: u64,
}

impl Session {
    pub fn welcome(&self, name: &str) -> String {
        format!("#{} {}", self.number, self.desk.greeter.greet(name))
    }
}

impl Injectable for Session {
    fn dependencies() -> Vec<TypeKey> {
        vec![TypeKey::of::<FrontDesk>()]
    }

    fn construct(deps: &mut Dependencies<'_>) -> Result<Self, BoxError> {
        let desk: Arc<FrontDesk> = deps.take()?;
        let number = desk.counter.bump();
        Ok(Session { desk, number })
    }
}
