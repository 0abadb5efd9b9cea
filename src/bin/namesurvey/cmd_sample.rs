use anyhow::{Context, Result};
use indicatif::{HumanCount, HumanDuration};
use std::time::Instant;
use tracing::{debug, debug_span};

use namesurvey::database::Database;
use namesurvey::defaults::{SAMPLES_JSON_FILENAME, SAMPLES_TEXT_FILENAME};
use namesurvey::report::{write_text_file, SamplesText};
use namesurvey::sampler::Sampler;

use crate::args;
use crate::style::{STYLE_HEADING, STYLE_METADATA};

/// This command draws a random sample of names from each requested table and records the
/// samples as JSON and as plain text.
pub fn run(_global_args: &args::GlobalArgs, args: &args::SampleArgs) -> Result<()> {
    let _span = debug_span!("sample").entered();

    debug!("Args: {args:#?}");

    let db = Database::open(&args.database)?;
    debug!("Opened database at {}", db.path().display());
    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;

    let tables = args.tables();
    let t1 = Instant::now();
    let sampler = Sampler::new(&db, args.sample_size);
    let samples = sampler.sample_tables(&tables, &mut rand::thread_rng());
    let elapsed = t1.elapsed();

    let json_path = args.output_dir.join(SAMPLES_JSON_FILENAME);
    samples.to_json_file(&json_path)?;
    let text_path = args.output_dir.join(SAMPLES_TEXT_FILENAME);
    write_text_file(&text_path, &SamplesText(&samples))?;

    println!(
        "Sampled {} names from {} of {} tables in {}",
        HumanCount(samples.num_samples() as u64),
        samples.len(),
        tables.len(),
        HumanDuration(elapsed),
    );
    println!("{}", STYLE_HEADING.apply_to("Samples written to:"));
    println!("  {}", STYLE_METADATA.apply_to(json_path.display()));
    println!("  {}", STYLE_METADATA.apply_to(text_path.display()));

    Ok(())
}
