//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use narrative_core::{parse_selection, Input, Pacing, Presentation, Selection};

#[derive(Debug, Default)]
pub struct Transcript {
    pub lines: Vec<String>,
}

impl Transcript {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl Presentation for Transcript {
    fn present(&mut self, text: &str, _pacing: Option<Pacing>) {
        self.lines.push(text.to_string());
    }
}

/// Feeds canned answers, then reports closed input.
#[derive(Debug, Default)]
pub struct Script {
    answers: VecDeque<String>,
}

impl Script {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Input for Script {
    fn select(&mut self, _prompt: &str, _choices: &[String]) -> Selection {
        self.answers
            .pop_front()
            .map(|line| parse_selection(&line))
            .unwrap_or(Selection::Closed)
    }

    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.answers.pop_front()
    }
}
