use anyhow::{bail, Context, Result};
use rand::Rng;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

// -------------------------------------------------------------------------------------------------
// Sample
// -------------------------------------------------------------------------------------------------
/// One name/comment pair extracted from a source table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "Name")]
    pub name: String,

    /// Empty when the source row had no comment, or the table has no comments column
    #[serde(rename = "Comments")]
    pub comments: String,
}

impl Sample {
    pub fn new<N: Into<String>, C: Into<String>>(name: N, comments: C) -> Self {
        Sample {
            name: name.into(),
            comments: comments.into(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// TableSampleSet
// -------------------------------------------------------------------------------------------------
/// The samples drawn from a single table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSampleSet {
    /// The table the samples were drawn from.
    ///
    /// This is the key of the enclosing `SampleSet` map when serialized.
    #[serde(skip)]
    pub table: String,

    /// The number of rows in the table with a non-empty name
    pub total_count: usize,

    /// The number of samples retained; at most the sample cap and at most `total_count`
    pub sample_count: usize,

    /// Whether the table has a comments column
    pub has_comments: bool,

    pub samples: Vec<Sample>,
}

impl TableSampleSet {
    pub fn new<T: Into<String>>(
        table: T,
        total_count: usize,
        has_comments: bool,
        samples: Vec<Sample>,
    ) -> Self {
        TableSampleSet {
            table: table.into(),
            total_count,
            sample_count: samples.len(),
            has_comments,
            samples,
        }
    }

    /// Check the counting invariants of a deserialized entry.
    fn check(&self) -> Result<()> {
        if self.sample_count != self.samples.len() {
            bail!(
                "Table {} claims {} samples but has {}",
                self.table,
                self.sample_count,
                self.samples.len()
            );
        }
        if self.sample_count > self.total_count {
            bail!(
                "Table {} has more samples ({}) than rows ({})",
                self.table,
                self.sample_count,
                self.total_count
            );
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
// SampleSet
// -------------------------------------------------------------------------------------------------
/// The samples of every table that was sampled, in sampling order.
///
/// This is serialized as a JSON object keyed by table name; the key order follows the sampling
/// order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleSet {
    tables: Vec<TableSampleSet>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the samples for a table, replacing any previous entry for the same table.
    pub fn insert(&mut self, table_samples: TableSampleSet) {
        match self.tables.iter_mut().find(|t| t.table == table_samples.table) {
            Some(existing) => *existing = table_samples,
            None => self.tables.push(table_samples),
        }
    }

    pub fn get(&self, table: &str) -> Option<&TableSampleSet> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableSampleSet> {
        self.tables.iter()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.table.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// The total number of samples across all tables.
    pub fn num_samples(&self) -> usize {
        self.tables.iter().map(|t| t.samples.len()).sum()
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let infile = File::open(path)
            .with_context(|| format!("Failed to read samples from {}", path.display()))?;
        let reader = BufReader::new(infile);
        let samples: Self = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to load samples JSON from {}", path.display()))?;
        for table in samples.iter() {
            table
                .check()
                .with_context(|| format!("Malformed samples in {}", path.display()))?;
        }
        debug!("Loaded {} tables from {}", samples.len(), path.display());
        Ok(samples)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let outfile = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(outfile);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write samples JSON to {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a TableSampleSet;
    type IntoIter = std::slice::Iter<'a, TableSampleSet>;
    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

impl FromIterator<TableSampleSet> for SampleSet {
    fn from_iter<I: IntoIterator<Item = TableSampleSet>>(iter: I) -> Self {
        let mut set = SampleSet::new();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

impl Serialize for SampleSet {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.tables.len()))?;
        for t in self.tables.iter() {
            map.serialize_entry(&t.table, t)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SampleSet {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct SampleSetVisitor;

        impl<'de> Visitor<'de> for SampleSetVisitor {
            type Value = SampleSet;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of table names to table samples")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SampleSet, A::Error> {
                let mut set = SampleSet::new();
                while let Some((table, mut entry)) =
                    access.next_entry::<String, TableSampleSet>()?
                {
                    entry.table = table;
                    set.insert(entry);
                }
                Ok(set)
            }
        }

        d.deserialize_map(SampleSetVisitor)
    }
}

// -------------------------------------------------------------------------------------------------
// Reservoir
// -------------------------------------------------------------------------------------------------
/// A uniform random sample without replacement of at most `capacity` items from a stream of
/// unknown length.
///
/// Only `capacity` items are held at any time. While fewer than `capacity` items have been
/// offered, every item is kept, in offer order.
pub struct Reservoir<T> {
    capacity: usize,
    seen: usize,
    items: Vec<T>,
}

impl<T> Reservoir<T> {
    pub fn new(capacity: usize) -> Self {
        Reservoir {
            capacity,
            seen: 0,
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn offer<R: Rng + ?Sized>(&mut self, item: T, rng: &mut R) {
        self.seen += 1;
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else if self.capacity > 0 {
            let slot = rng.gen_range(0..self.seen);
            if slot < self.capacity {
                self.items[slot] = item;
            }
        }
    }

    /// The number of items offered so far.
    #[inline]
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Consume the reservoir, returning the retained items and the number of items offered.
    pub fn into_parts(self) -> (Vec<T>, usize) {
        (self.items, self.seen)
    }
}
