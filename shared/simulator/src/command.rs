//! Text commands standing in for operator input.
//!
//! One command per line:
//!
//! ```text
//! target (12.5, -3)
//! press forward
//! launch
//! wait 2.5
//! release forward
//! ```
//!
//! Blank lines and lines starting with `#` are ignored by [`Script::parse`].

use crate::carrier::Key;
use crate::scene::Scene;
use crate::simulation::Simulation;
use anyhow::Context;
use lazy_static::lazy_static;
use nalgebra::{vector, Vector2};
use regex::Regex;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Launch,
    Target(Vector2<f64>),
    Press(Key),
    Release(Key),
    Wait(f64),
}

pub fn parse(line: &str) -> anyhow::Result<Command> {
    lazy_static! {
        static ref TARGET_RE: Regex = Regex::new(r"^target (\(.+?\))$").unwrap();
        static ref KEY_RE: Regex = Regex::new(r"^(press|release) (\w+)$").unwrap();
        static ref WAIT_RE: Regex = Regex::new(r"^wait ([\d.]+)$").unwrap();
    }
    let line = line.trim();
    if line == "launch" {
        Ok(Command::Launch)
    } else if let Some(cap) = TARGET_RE.captures(line) {
        Ok(Command::Target(parse_vec2(&cap[1])?))
    } else if let Some(cap) = KEY_RE.captures(line) {
        let key: Key = cap[2].parse()?;
        if &cap[1] == "press" {
            Ok(Command::Press(key))
        } else {
            Ok(Command::Release(key))
        }
    } else if let Some(cap) = WAIT_RE.captures(line) {
        let seconds: f64 = cap[1].parse()?;
        Ok(Command::Wait(seconds))
    } else {
        anyhow::bail!("Unknown command {:?}", line)
    }
}

fn parse_vec2(s: &str) -> anyhow::Result<Vector2<f64>> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\(\s*([\-\d.]+)\s*,\s*([\-\d.]+)\s*\)$").unwrap();
    }
    let cap = RE
        .captures(s)
        .ok_or_else(|| anyhow::anyhow!("Failed to parse {:?}", s))?;
    let x: f64 = cap[1].parse()?;
    let y: f64 = cap[2].parse()?;
    Ok(vector![x, y])
}

/// A command list replayed against the simulation clock.
#[derive(Clone, Debug, Default)]
pub struct Script {
    commands: Vec<Command>,
    cursor: usize,
    resume_time: f64,
}

impl Script {
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands,
            cursor: 0,
            resume_time: 0.0,
        }
    }

    pub fn parse(src: &str) -> anyhow::Result<Self> {
        let mut commands = vec![];
        for (i, line) in src.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            commands.push(parse(line).with_context(|| format!("line {}", i + 1))?);
        }
        Ok(Self::new(commands))
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.commands.len()
    }

    /// Applies every command that is due, stopping at the first pending wait.
    pub fn tick<S: Scene>(&mut self, sim: &mut Simulation<S>) {
        while !self.is_done() && sim.time() >= self.resume_time {
            match &self.commands[self.cursor] {
                Command::Wait(seconds) => self.resume_time = sim.time() + seconds,
                command => sim.apply(command),
            }
            self.cursor += 1;
        }
    }
}
