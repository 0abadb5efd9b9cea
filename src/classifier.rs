use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, debug_span};

use crate::defaults::SHIP_TABLE;
use crate::patterns::*;
use crate::sample::{Sample, SampleSet};

// -------------------------------------------------------------------------------------------------
// PatternCategory
// -------------------------------------------------------------------------------------------------
/// A naming pattern that samples are checked for.
///
/// Categories are independent: a sample can fall into any number of them.
/// The declaration order is the reporting order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PatternCategory {
    /// The name contains a NATO reporting name
    NatoCodenames,

    /// The name contains a bracketed alias
    WithBrackets,

    /// The name contains a calibre/length designation like `127mm/54`
    WithSlashes,

    /// The name contains a manufacturer
    ManufacturerNames,

    /// Reserved; no detector populates it
    ModelNumbers,

    /// Reserved; no detector populates it
    Abbreviations,

    /// The name looks like a Chinese designation (`J-10`, `Type 052`, `HQ-9`)
    ChineseDesignations,

    /// The name looks like a Soviet/Russian designation (`Su-27`, `Pr.956`, `SA-10`)
    RussianDesignations,

    /// A ship table name that starts with a hull number (`DDG 51 ...`)
    ShipDesignations,

    /// The comment contains a parenthetical
    WithParentheses,

    /// Reserved; no detector populates it
    TechnicalSpecs,

    /// The comment mentions a year in 1900-2099
    YearReferences,

    /// The comment contains a count like `4x`
    QuantityExpressions,

    /// The item is marked deprecated, cancelled, or retired
    DeprecatedItems,
}

/// The outcome of a successful detector check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Detection {
    /// The manufacturer that was found, for `ManufacturerNames`
    pub manufacturer: Option<&'static str>,
}

impl PatternCategory {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether this category exists for reporting only and never collects matches.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            PatternCategory::ModelNumbers
                | PatternCategory::Abbreviations
                | PatternCategory::TechnicalSpecs
        )
    }

    /// Check a sample from `table` against this category.
    pub fn detect(self, table: &str, sample: &Sample) -> Option<Detection> {
        use PatternCategory::*;

        let name = sample.name.as_str();
        let comments = sample.comments.as_str();

        match self {
            NatoCodenames => first_contained(NATO_CODENAMES, name).map(|_| Detection::default()),

            WithBrackets => (name.contains('[') && name.contains(']')).then_some(Detection::default()),

            WithSlashes => {
                (name.contains('/') && CALIBRE_SLASH.is_match(name)).then_some(Detection::default())
            }

            ManufacturerNames => first_contained(MANUFACTURERS, name).map(|m| Detection {
                manufacturer: Some(m),
            }),

            ChineseDesignations => (CHINESE_PREFIX.is_match(name)
                || CHINESE_TYPE.is_match(name)
                || CHINESE_FAMILY.is_match(name))
            .then_some(Detection::default()),

            RussianDesignations => (RUSSIAN_PREFIX.is_match(name)
                || RUSSIAN_PROJECT.is_match(name)
                || RUSSIAN_FAMILY.is_match(name))
            .then_some(Detection::default()),

            ShipDesignations => {
                (table == SHIP_TABLE && HULL_NUMBER.is_match(name)).then_some(Detection::default())
            }

            WithParentheses => {
                (comments.contains('(') && comments.contains(')')).then_some(Detection::default())
            }

            YearReferences => YEAR.is_match(comments).then_some(Detection::default()),

            QuantityExpressions => QUANTITY.is_match(comments).then_some(Detection::default()),

            DeprecatedItems => (name.to_uppercase().contains("DEPRECATED")
                || comments.to_uppercase().contains("DEPRECATED")
                || comments.contains("Cancelled")
                || comments.contains("Retired"))
            .then_some(Detection::default()),

            ModelNumbers | Abbreviations | TechnicalSpecs => None,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// PatternMatch
// -------------------------------------------------------------------------------------------------
/// A sample that matched some category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub table: String,

    pub name: String,

    /// Only present for `manufacturer_names` matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,

    pub comments: String,
}

// -------------------------------------------------------------------------------------------------
// PatternAnalysis
// -------------------------------------------------------------------------------------------------
/// The matches of every category, each in table-then-sample order.
///
/// Every category is always present, possibly with no matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<PatternCategory, Vec<PatternMatch>>")]
pub struct PatternAnalysis {
    #[serde(flatten)]
    matches: BTreeMap<PatternCategory, Vec<PatternMatch>>,
}

impl From<BTreeMap<PatternCategory, Vec<PatternMatch>>> for PatternAnalysis {
    fn from(mut matches: BTreeMap<PatternCategory, Vec<PatternMatch>>) -> Self {
        for category in PatternCategory::iter() {
            matches.entry(category).or_default();
        }
        PatternAnalysis { matches }
    }
}

impl Default for PatternAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternAnalysis {
    pub fn new() -> Self {
        BTreeMap::new().into()
    }

    /// Run every category's detector over every sample.
    pub fn from_samples(samples: &SampleSet) -> Self {
        let _span = debug_span!("PatternAnalysis::from_samples").entered();

        let mut analysis = Self::new();
        for table in samples.iter() {
            for sample in table.samples.iter() {
                analysis.classify(&table.table, sample);
            }
        }
        debug!(
            "Classified {} samples from {} tables into {} matches",
            samples.num_samples(),
            samples.len(),
            analysis.num_matches()
        );
        analysis
    }

    /// Check one sample against every category, recording it under each one it matches.
    pub fn classify(&mut self, table: &str, sample: &Sample) {
        for category in PatternCategory::iter() {
            if let Some(detection) = category.detect(table, sample) {
                self.matches.entry(category).or_default().push(PatternMatch {
                    table: table.to_string(),
                    name: sample.name.clone(),
                    manufacturer: detection.manufacturer.map(str::to_string),
                    comments: sample.comments.clone(),
                });
            }
        }
    }

    pub fn matches(&self, category: PatternCategory) -> &[PatternMatch] {
        self.matches.get(&category).map_or(&[], |v| v.as_slice())
    }

    /// Iterate over every category and its matches, in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (PatternCategory, &[PatternMatch])> {
        self.matches.iter().map(|(c, ms)| (*c, ms.as_slice()))
    }

    /// The categories that `name` from `table` was recorded under.
    pub fn categories_of(&self, table: &str, name: &str) -> Vec<PatternCategory> {
        self.iter()
            .filter(|(_, ms)| ms.iter().any(|m| m.table == table && m.name == name))
            .map(|(c, _)| c)
            .collect()
    }

    pub fn num_matches(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics(self.iter().map(|(c, ms)| (c, ms.len())).collect())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let infile = File::open(path)
            .with_context(|| format!("Failed to read pattern analysis from {}", path.display()))?;
        let analysis: Self = serde_json::from_reader(BufReader::new(infile))
            .with_context(|| format!("Failed to load pattern analysis JSON from {}", path.display()))?;
        Ok(analysis)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let outfile = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(outfile);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write pattern analysis JSON to {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
// Statistics
// -------------------------------------------------------------------------------------------------
/// The number of matches per category, including categories without matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics(pub BTreeMap<PatternCategory, usize>);

impl Statistics {
    pub fn count(&self, category: PatternCategory) -> usize {
        self.0.get(&category).copied().unwrap_or(0)
    }

    /// Categories with at least one match, most frequent first.
    ///
    /// Ties keep reporting order.
    pub fn nonzero_by_count(&self) -> Vec<(PatternCategory, usize)> {
        let mut es: Vec<_> = self
            .0
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(c, n)| (*c, *n))
            .collect();
        es.sort_by(|a, b| b.1.cmp(&a.1));
        es
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (category, count) in self.0.iter() {
            writeln!(f, "{category}: {count} samples")?;
        }
        Ok(())
    }
}
