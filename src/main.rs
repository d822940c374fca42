extern crate ambience2abm;

use ambience2abm::input::{ingest_config, ProjectConfig};
use ambience2abm::output::FileOutput;
use ambience2abm::{run_project, ProjectFlags};
use clap::Parser;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Ambience2AbmArgs {
    #[arg(help = "Path to the run configuration in .json format; defaults apply when omitted")]
    config_file: Option<PathBuf>,
    #[arg(
        long,
        short,
        default_value = "data",
        help = "Directory to write the exported tables into"
    )]
    output_dir: PathBuf,
    #[arg(long, short, default_value_t = Level::INFO, help = "Maximum level of log output")]
    log_level: Level,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Process the building stock without the configured extrapolation"
    )]
    no_extrapolation: bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Export the tables without a datapackage.json manifest"
    )]
    skip_datapackage: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Ambience2AbmArgs::parse();

    // set up basic tracing
    let tracing_subscriber = {
        let mut builder = tracing_subscriber::fmt::fmt().with_max_level(args.log_level);

        if args.log_spans {
            builder = builder.with_span_events(FmtSpan::CLOSE);
        }

        builder.finish()
    };
    tracing::subscriber::set_global_default(tracing_subscriber)?;

    let config = match args.config_file {
        Some(ref path) => ingest_config(File::open(path)?)?,
        None => ProjectConfig::default(),
    };

    let mut flags = ProjectFlags::empty();
    if args.no_extrapolation {
        flags.insert(ProjectFlags::SKIP_EXTRAPOLATION);
    }
    if args.skip_datapackage {
        flags.insert(ProjectFlags::SKIP_DATAPACKAGE);
    }

    fs::create_dir_all(&args.output_dir)?;
    let output = FileOutput::in_directory(args.output_dir.clone());

    let results = run_project(&config, &output, &flags)?;
    info!(
        "wrote {} building stock statistics to {}",
        results.dataset.building_stock_statistics.len(),
        args.output_dir.display()
    );

    Ok(())
}
