use anyhow::Result;
use indicatif::HumanCount;

use namesurvey::classifier::{PatternAnalysis, Statistics};

use crate::args::{GlobalArgs, Reportable, SummarizeArgs};

pub fn run(_global_args: &GlobalArgs, args: &SummarizeArgs) -> Result<()> {
    let analysis = PatternAnalysis::from_json_file(&args.input)?;
    StatisticsReporter(analysis.statistics()).report(&args.output_args)
}

struct StatisticsReporter(Statistics);

impl Reportable for StatisticsReporter {
    fn human_format<W: std::io::Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer)?;
        let table = summary_table(&self.0);
        table.print(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn json_format<W: std::io::Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.0)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// A table of the categories with matches, most frequent first.
pub fn summary_table(stats: &Statistics) -> prettytable::Table {
    use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};
    use prettytable::row;

    let f = FormatBuilder::new()
        .column_separator(' ')
        .separators(&[LinePosition::Title], LineSeparator::new('─', '─', '─', '─'))
        .padding(1, 1)
        .build();

    let mut table: prettytable::Table = stats
        .nonzero_by_count()
        .into_iter()
        .map(|(category, count)| row![
             l -> category.name(),
             r -> HumanCount(count as u64)
        ])
        .collect();
    table.set_format(f);
    table.set_titles(row![lb -> "Pattern", cb -> "Samples"]);
    table
}
