use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::{AnyVerError, Result};

pub mod parser;
pub mod storage;
mod template;

use parser::ParsedVersion;
use storage::Components;

/// Separator used when synthesizing a format for explicit components.
const DEFAULT_SEPARATOR: &str = ".";
/// Suffix template applied when a hash is present but none was given.
const DEFAULT_SUFFIX_FORMAT: &str = "-{hash}";

/// A version value that remembers how it was written.
///
/// Holds the numeric components at the narrowest storage width that fits
/// them, the optional trailing hash token, and the templates needed to
/// render the value back to its original text. Values parsed from a string
/// render back byte-for-byte; mutating a component only changes that
/// component's digits in the output.
#[derive(Debug, Clone)]
pub struct AnyVer {
    components: Components,
    hash: Option<String>,
    format: String,
    suffix_format: String,
}

impl AnyVer {
    /// Builds a version from explicit component values with the default
    /// dot-joined format and no hash.
    pub fn new(components: impl IntoIterator<Item = u64>) -> Self {
        let values: Vec<u64> = components.into_iter().collect();
        let format = default_format(values.len());
        Self {
            components: Components::new(&values),
            hash: None,
            format,
            suffix_format: String::new(),
        }
    }

    /// Attaches a hash token. Falls back to the `-{hash}` suffix template
    /// unless an explicit suffix template is already set. The hash is fixed
    /// for the lifetime of the value; component mutation never touches it.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        if self.suffix_format.is_empty() {
            self.suffix_format = DEFAULT_SUFFIX_FORMAT.to_string();
        }
        self
    }

    /// Replaces the component format template. The template must reference
    /// exactly the indices `0..len`.
    pub fn with_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        template::validate_component_template(&format, self.components.len())?;
        self.format = format;
        Ok(self)
    }

    /// Replaces the suffix template. Only the `{hash}` placeholder is
    /// allowed here.
    pub fn with_suffix_format(mut self, suffix_format: impl Into<String>) -> Result<Self> {
        let suffix_format = suffix_format.into();
        template::validate_suffix_template(&suffix_format)?;
        self.suffix_format = suffix_format;
        Ok(self)
    }

    fn from_parsed(parsed: ParsedVersion) -> Self {
        let ParsedVersion {
            format,
            components,
            hash,
            suffix_format,
        } = parsed;
        let suffix_format = if suffix_format.is_empty() && hash.is_some() {
            DEFAULT_SUFFIX_FORMAT.to_string()
        } else {
            suffix_format
        };
        Self {
            components: Components::new(&components),
            hash,
            format,
            suffix_format,
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> storage::Iter<'_> {
        self.components.iter()
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn suffix_format(&self) -> &str {
        &self.suffix_format
    }

    pub fn hash_token(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn get(&self, index: usize) -> Result<u64> {
        self.components
            .get(index)
            .ok_or(AnyVerError::IndexOutOfRange {
                index,
                len: self.components.len(),
            })
    }

    /// Writes a component value. Storage widens in place when the value
    /// does not fit the current width.
    pub fn set(&mut self, index: usize, value: u64) -> Result<()> {
        if self.components.set(index, value) {
            Ok(())
        } else {
            Err(AnyVerError::IndexOutOfRange {
                index,
                len: self.components.len(),
            })
        }
    }

    /// First component. Fails on a version with no components.
    pub fn major(&self) -> Result<u64> {
        self.named_get("major", 0)
    }

    /// Second component.
    pub fn minor(&self) -> Result<u64> {
        self.named_get("minor", 1)
    }

    /// Third component.
    pub fn patch(&self) -> Result<u64> {
        self.named_get("patch", 2)
    }

    /// Fourth component.
    pub fn tweak(&self) -> Result<u64> {
        self.named_get("tweak", 3)
    }

    pub fn set_major(&mut self, value: u64) -> Result<()> {
        self.named_set("major", 0, value)
    }

    pub fn set_minor(&mut self, value: u64) -> Result<()> {
        self.named_set("minor", 1, value)
    }

    pub fn set_patch(&mut self, value: u64) -> Result<()> {
        self.named_set("patch", 2, value)
    }

    pub fn set_tweak(&mut self, value: u64) -> Result<()> {
        self.named_set("tweak", 3, value)
    }

    fn named_get(&self, field: &'static str, index: usize) -> Result<u64> {
        self.components
            .get(index)
            .ok_or(AnyVerError::MissingComponent {
                field,
                len: self.components.len(),
            })
    }

    fn named_set(&mut self, field: &'static str, index: usize, value: u64) -> Result<()> {
        if self.components.set(index, value) {
            Ok(())
        } else {
            Err(AnyVerError::MissingComponent {
                field,
                len: self.components.len(),
            })
        }
    }
}

fn default_format(len: usize) -> String {
    (0..len)
        .map(|i| format!("{{{i}}}"))
        .collect::<Vec<_>>()
        .join(DEFAULT_SEPARATOR)
}

impl FromStr for AnyVer {
    type Err = AnyVerError;

    fn from_str(s: &str) -> Result<Self> {
        parser::parse(s).map(Self::from_parsed)
    }
}

impl fmt::Display for AnyVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        template::render_into(f, &self.format, &self.components, self.hash.as_deref())?;
        template::render_into(f, &self.suffix_format, &self.components, self.hash.as_deref())
    }
}

/// Two versions are equal when their numeric sequences and their format
/// templates agree. The hash token and suffix template do not participate.
impl PartialEq for AnyVer {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components && self.format == other.format
    }
}

impl Eq for AnyVer {}

/// Comparison against a bare numeric sequence ignores the format.
impl PartialEq<[u64]> for AnyVer {
    fn eq(&self, other: &[u64]) -> bool {
        self.iter().eq(other.iter().copied())
    }
}

impl PartialEq<&[u64]> for AnyVer {
    fn eq(&self, other: &&[u64]) -> bool {
        self == *other
    }
}

impl PartialEq<Vec<u64>> for AnyVer {
    fn eq(&self, other: &Vec<u64>) -> bool {
        self == other.as_slice()
    }
}

impl<const N: usize> PartialEq<[u64; N]> for AnyVer {
    fn eq(&self, other: &[u64; N]) -> bool {
        self == other.as_slice()
    }
}

impl PartialEq<AnyVer> for Vec<u64> {
    fn eq(&self, other: &AnyVer) -> bool {
        other == self
    }
}

impl<const N: usize> PartialEq<AnyVer> for [u64; N] {
    fn eq(&self, other: &AnyVer) -> bool {
        other == self
    }
}

/// Lexicographic over the numeric sequences, independent of templates and
/// hash. Equal sequences with differing formats are unequal but neither
/// less nor greater, so this is a partial order only.
impl PartialOrd for AnyVer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.components.cmp(&other.components) {
            Ordering::Equal if self.format != other.format => None,
            ordering => Some(ordering),
        }
    }
}

impl Hash for AnyVer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
        self.format.hash(state);
    }
}

/// Renders the version and appends a literal. Appending another version is
/// deliberately not implemented.
impl Add<&str> for &AnyVer {
    type Output = String;

    fn add(self, rhs: &str) -> String {
        format!("{self}{rhs}")
    }
}

impl Add<&AnyVer> for &str {
    type Output = String;

    fn add(self, rhs: &AnyVer) -> String {
        format!("{self}{rhs}")
    }
}

impl<'a> IntoIterator for &'a AnyVer {
    type Item = u64;
    type IntoIter = storage::Iter<'a>;

    fn into_iter(self) -> storage::Iter<'a> {
        self.iter()
    }
}

impl Serialize for AnyVer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnyVer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}
