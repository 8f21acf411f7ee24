use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of result rows requested per page. Fixed for the lifetime of a session.
pub const PAGE_SIZE: u64 = 2000;

/// 1-based page index into the combination set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Page(u64);

impl Page {
    pub const FIRST: Page = Page(1);

    /// Returns `None` for page 0.
    pub fn new(number: u64) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns `None` when already on the first page.
    pub fn previous(self) -> Option<Self> {
        Self::new(self.0 - 1)
    }

    pub fn is_first(self) -> bool {
        self.0 == 1
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four subshell parameters of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    S,
    P,
    D,
    F,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::S, Axis::P, Axis::D, Axis::F];

    pub fn label(self) -> &'static str {
        match self {
            Axis::S => "s",
            Axis::P => "p",
            Axis::D => "d",
            Axis::F => "f",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw form values for the four parameters. Forwarded to the service as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub s: String,
    pub p: String,
    pub d: String,
    pub f: String,
}

impl SimulationParameters {
    pub fn new(
        s: impl Into<String>,
        p: impl Into<String>,
        d: impl Into<String>,
        f: impl Into<String>,
    ) -> Self {
        Self {
            s: s.into(),
            p: p.into(),
            d: d.into(),
            f: f.into(),
        }
    }

    pub fn get(&self, axis: Axis) -> &str {
        match axis {
            Axis::S => &self.s,
            Axis::P => &self.p,
            Axis::D => &self.d,
            Axis::F => &self.f,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut String {
        match axis {
            Axis::S => &mut self.s,
            Axis::P => &mut self.p,
            Axis::D => &mut self.d,
            Axis::F => &mut self.f,
        }
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::new("0", "0", "0", "0")
    }
}
