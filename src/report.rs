use anyhow::{Context, Result};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::classifier::PatternAnalysis;
use crate::sample::SampleSet;

const RULE_WIDTH: usize = 80;

fn heavy_rule(f: &mut Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn light_rule(f: &mut Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

/// Write the `Display` rendering of `value` to a new file at `path`, replacing any existing file.
pub fn write_text_file<P: AsRef<Path>, T: Display>(path: P, value: &T) -> Result<()> {
    use std::io::Write;

    let path = path.as_ref();
    let outfile = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(outfile);
    write!(writer, "{value}")
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// -------------------------------------------------------------------------------------------------
// SamplesText
// -------------------------------------------------------------------------------------------------
/// A human-readable listing of every sample, grouped by table.
pub struct SamplesText<'a>(pub &'a SampleSet);

impl Display for SamplesText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for table in self.0.iter() {
            writeln!(f)?;
            heavy_rule(f)?;
            writeln!(f, "Table: {}", table.table)?;
            writeln!(
                f,
                "Total: {}, Samples: {}, Has comments: {}",
                table.total_count, table.sample_count, table.has_comments
            )?;
            heavy_rule(f)?;
            writeln!(f)?;

            for (i, sample) in table.samples.iter().enumerate() {
                writeln!(f, "{}. Name: {}", i + 1, sample.name)?;
                if !sample.comments.is_empty() {
                    writeln!(f, "   Comments: {}", sample.comments)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
// AnalysisReport
// -------------------------------------------------------------------------------------------------
/// The human-readable pattern analysis report: a statistics block, then the first few matches
/// of each category that has any.
pub struct AnalysisReport<'a> {
    pub analysis: &'a PatternAnalysis,

    /// The maximum number of matches listed per category
    pub example_limit: usize,
}

impl Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        heavy_rule(f)?;
        writeln!(f, "Sample Naming Pattern Analysis Report")?;
        heavy_rule(f)?;
        writeln!(f)?;

        writeln!(f, "Statistics:")?;
        light_rule(f)?;
        write!(f, "{}", self.analysis.statistics())?;
        writeln!(f)?;
        writeln!(f)?;

        for (category, matches) in self.analysis.iter() {
            if matches.is_empty() {
                continue;
            }
            heavy_rule(f)?;
            writeln!(f, "Pattern: {category}")?;
            writeln!(f, "Samples: {}", matches.len())?;
            heavy_rule(f)?;
            writeln!(f)?;

            for (i, m) in matches.iter().take(self.example_limit).enumerate() {
                writeln!(f, "{}. [{}]", i + 1, m.table)?;
                writeln!(f, "   Name: {}", m.name)?;
                if !m.comments.is_empty() {
                    writeln!(f, "   Comments: {}", m.comments)?;
                }
                writeln!(f)?;
            }

            if matches.len() > self.example_limit {
                writeln!(f, "   ... {} more samples", matches.len() - self.example_limit)?;
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
// test
// -------------------------------------------------------------------------------------------------
#[cfg(test)]
mod test {
    use super::*;
    use crate::sample::{Sample, TableSampleSet};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn samples_text() {
        let set: SampleSet = [TableSampleSet::new(
            "DataShip",
            12,
            true,
            vec![Sample::new("DDG 51 Arleigh Burke", "Flight I"), Sample::new("CG 47 Ticonderoga", "")],
        )]
        .into_iter()
        .collect();

        let expected = indoc! {"

            ================================================================================
            Table: DataShip
            Total: 12, Samples: 2, Has comments: true
            ================================================================================

            1. Name: DDG 51 Arleigh Burke
               Comments: Flight I

            2. Name: CG 47 Ticonderoga

        "};
        assert_eq!(SamplesText(&set).to_string(), expected);
    }

    #[test]
    fn report_truncates_examples() {
        let samples: Vec<Sample> = (1..=4)
            .map(|i| Sample::new(format!("Hull {i} [alias]"), if i == 1 { "first" } else { "" }))
            .collect();
        let set: SampleSet = [TableSampleSet::new("DataShip", 4, true, samples)]
            .into_iter()
            .collect();
        let analysis = PatternAnalysis::from_samples(&set);
        let report = AnalysisReport { analysis: &analysis, example_limit: 2 }.to_string();

        let expected_tail = indoc! {"
            ================================================================================
            Pattern: with_brackets
            Samples: 4
            ================================================================================

            1. [DataShip]
               Name: Hull 1 [alias]
               Comments: first

            2. [DataShip]
               Name: Hull 2 [alias]

               ... 2 more samples

        "};
        assert!(report.ends_with(expected_tail), "unexpected report:\n{report}");
        assert!(report.starts_with(indoc! {"
            ================================================================================
            Sample Naming Pattern Analysis Report
            ================================================================================

            Statistics:
            --------------------------------------------------------------------------------
            nato_codenames: 0 samples
        "}));
        assert!(report.contains("technical_specs: 0 samples\n"));
        assert!(report.contains("deprecated_items: 0 samples\n\n\n"));
        assert!(!report.contains("Pattern: technical_specs"));
    }

    #[test]
    fn multiline_comments_are_written_verbatim() {
        let sample = Sample::new("Hull [a]", "line one (1990)\nline two");
        let set: SampleSet = [TableSampleSet::new("DataShip", 1, true, vec![sample])]
            .into_iter()
            .collect();
        let analysis = PatternAnalysis::from_samples(&set);
        let report = AnalysisReport { analysis: &analysis, example_limit: 10 }.to_string();

        assert!(report.contains("   Comments: line one (1990)\nline two\n"), "{report}");
        assert!(!report.contains("   line two"));

        let text = SamplesText(&set).to_string();
        assert!(text.contains("   Comments: line one (1990)\nline two\n"), "{text}");
    }
}
