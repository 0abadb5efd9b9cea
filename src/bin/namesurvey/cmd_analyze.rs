use anyhow::{Context, Result};
use tracing::{debug, debug_span};

use namesurvey::classifier::PatternAnalysis;
use namesurvey::defaults::{ANALYSIS_JSON_FILENAME, ANALYSIS_REPORT_FILENAME, REPORT_EXAMPLE_LIMIT};
use namesurvey::report::{write_text_file, AnalysisReport};
use namesurvey::sample::SampleSet;

use crate::args;
use crate::cmd_summarize::summary_table;
use crate::style::{STYLE_HEADING, STYLE_METADATA};

pub fn run(_global_args: &args::GlobalArgs, args: &args::AnalyzeArgs) -> Result<()> {
    let _span = debug_span!("analyze").entered();

    debug!("Args: {args:#?}");

    let samples = SampleSet::from_json_file(&args.input)?;
    let analysis = PatternAnalysis::from_samples(&samples);

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;
    let json_path = args.output_dir.join(ANALYSIS_JSON_FILENAME);
    analysis.to_json_file(&json_path)?;
    let report_path = args.output_dir.join(ANALYSIS_REPORT_FILENAME);
    let report = AnalysisReport {
        analysis: &analysis,
        example_limit: REPORT_EXAMPLE_LIMIT,
    };
    write_text_file(&report_path, &report)?;

    println!(
        "Classified {} samples from {} tables",
        samples.num_samples(),
        samples.len()
    );
    println!("{}", STYLE_HEADING.apply_to("Analysis written to:"));
    println!("  {}", STYLE_METADATA.apply_to(json_path.display()));
    println!("  {}", STYLE_METADATA.apply_to(report_path.display()));
    println!();

    let mut stdout = std::io::stdout();
    match summary_table(&analysis.statistics()).print(&mut stdout) {
        // Ignore SIGPIPE errors, like those that can come from piping to `head`
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e)?,
        Ok(_) => Ok(()),
    }
}
