#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use nodebaker::catalog::{Catalog, CatalogMetadata};
use nodebaker::error::Result;
use nodebaker::prompt::Prompter;
use nodebaker::resolver::Parameters;

/// Builds a catalog from inline metadata and `(path, source)` pairs.
pub fn catalog(metadata: &str, sources: &[(&str, &str)]) -> Result<Catalog> {
    Catalog::from_sources(CatalogMetadata::parse(metadata)?, sources.iter().copied())
}

pub fn params(pairs: &[(&str, &str)]) -> Parameters {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Replays scripted answers and records every question asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    confirms: RefCell<VecDeque<bool>>,
    inputs: RefCell<VecDeque<String>>,
    selects: RefCell<VecDeque<usize>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm_with(self, answer: bool) -> Self {
        self.confirms.borrow_mut().push_back(answer);
        self
    }

    pub fn input_with(self, answer: &str) -> Self {
        self.inputs.borrow_mut().push_back(answer.to_string());
        self
    }

    pub fn select_with(self, answer: usize) -> Self {
        self.selects.borrow_mut().push_back(answer);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, skip: bool, prompt: String) -> Result<bool> {
        self.asked.borrow_mut().push(prompt);
        if skip {
            return Ok(true);
        }
        Ok(self.confirms.borrow_mut().pop_front().unwrap_or(false))
    }

    fn input(&self, prompt: String, default: Option<String>) -> Result<String> {
        self.asked.borrow_mut().push(prompt);
        Ok(self.inputs.borrow_mut().pop_front().or(default).unwrap_or_default())
    }

    fn select(&self, prompt: String, _items: &[String], default: usize) -> Result<usize> {
        self.asked.borrow_mut().push(prompt);
        Ok(self.selects.borrow_mut().pop_front().unwrap_or(default))
    }
}
