//! Parameter resolution for a single template descriptor.
//!
//! Each required parameter is taken from the user, then from the variant's
//! declared default, then from the global defaults of the run.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::catalog::TemplateDescriptor;
use crate::error::{Error, Result};

/// Flat `name -> value` mapping as supplied by the user or a config file.
pub type Parameters = IndexMap<String, String>;

/// Per-parameter value check declared in the catalog metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Non-empty, ASCII digits only
    Digits,
    /// Digits forming a TCP port in 1..=65535
    Port,
    /// An absolute URI such as a connection string
    Uri,
    /// A JavaScript-style identifier
    Identifier,
    /// Anything but blank
    NonEmpty,
}

impl Validator {
    /// Checks `value`, returning the reason it was rejected.
    pub fn validate(self, value: &str) -> std::result::Result<(), String> {
        match self {
            Validator::Digits => {
                if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(format!("'{}' must contain only digits", value));
                }
            }
            Validator::Port => {
                Validator::Digits.validate(value)?;
                match value.parse::<u32>() {
                    Ok(port) if (1..=65535).contains(&port) => {}
                    _ => return Err(format!("'{}' is not a port between 1 and 65535", value)),
                }
            }
            Validator::Uri => {
                Url::parse(value)
                    .map_err(|e| format!("'{}' is not a valid URI ({})", value, e))?;
            }
            Validator::Identifier => {
                let mut chars = value.chars();
                let valid = chars
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
                if !valid {
                    return Err(format!("'{}' is not a valid identifier", value));
                }
            }
            Validator::NonEmpty => {
                if value.trim().is_empty() {
                    return Err("value must not be empty".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    User,
    Variant,
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: String,
    pub source: ValueSource,
}

/// Resolved parameters of one descriptor, built fresh for every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    descriptor: String,
    values: IndexMap<String, ResolvedValue>,
}

impl ParameterSet {
    pub fn new<S: Into<String>>(descriptor: S) -> Self {
        ParameterSet { descriptor: descriptor.into(), values: IndexMap::new() }
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V, source: ValueSource) {
        self.values.insert(name.into(), ResolvedValue { value: value.into(), source });
    }

    /// Id of the descriptor these parameters were resolved for.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|resolved| resolved.value.as_str())
    }

    pub fn source(&self, name: &str) -> Option<ValueSource> {
        self.values.get(name).map(|resolved| resolved.source)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.values.iter().map(|(name, resolved)| (name.as_str(), resolved))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolves every required parameter of `descriptor`.
///
/// # Errors
/// * `Error::MissingParameter` when no source provides a value
/// * `Error::InvalidParameter` when a declared validator rejects the value
pub fn resolve(
    descriptor: &TemplateDescriptor,
    user_params: &Parameters,
    global_defaults: &Parameters,
) -> Result<ParameterSet> {
    let id = descriptor.id();
    let mut parameters = ParameterSet::new(id.as_str());

    for name in descriptor.parameters() {
        let (value, source) = if let Some(value) = user_params.get(name) {
            (value.as_str(), ValueSource::User)
        } else if let Some(value) = descriptor.default_for(name) {
            (value, ValueSource::Variant)
        } else if let Some(value) = global_defaults.get(name) {
            (value.as_str(), ValueSource::Global)
        } else {
            return Err(Error::MissingParameter { parameter: name.clone(), descriptor: id });
        };

        if let Some(validator) = descriptor.validator_for(name) {
            validator.validate(value).map_err(|reason| Error::InvalidParameter {
                parameter: name.clone(),
                descriptor: id.clone(),
                reason,
            })?;
        }

        debug!("{}: '{}' resolved from {:?}", id, name, source);
        parameters.insert(name.as_str(), value, source);
    }

    Ok(parameters)
}
