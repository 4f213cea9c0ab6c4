use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use itertools::Itertools;
use log::info;
use microscopium::prelude::*;

use crate::strings::run as strings;
use crate::utils::{
    open_output,
    validate_dir,
    validate_input,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct RunArgs {
    #[arg(short, long, help = strings::CONFIG)]
    config: Option<PathBuf>,

    #[arg(short, long = "data-dir", help = strings::DATA_DIR)]
    data_dir: Option<PathBuf>,

    #[arg(short, long, help = strings::OUTPUT)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = strings::PRETTY)]
    pretty: bool,

    #[arg(long, default_value_t = false, help = strings::SUMMARY)]
    summary: bool,
}

impl RunArgs {
    fn load_config(&self) -> anyhow::Result<PipelineConfig> {
        match &self.config {
            Some(path) => {
                let config = PipelineConfig::from_json_file(validate_input(path)?)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            },
            None => Ok(PipelineConfig::default()),
        }
    }

    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let data_dir = self
            .data_dir
            .as_deref()
            .map(validate_dir)
            .transpose()?;

        let pipeline = Pipeline::new(config)?;
        let output = pipeline.run_files(data_dir)?;
        info!(
            "Aggregated {} records over {} cells and {} genes",
            output.store.len_records(),
            output.store.len_cells(),
            output.store.len_genes()
        );

        if self.summary {
            print_summary(&output);
        }

        let mut sink = open_output(self.output.as_ref())?;
        let report = output.report();
        if self.pretty {
            serde_json::to_writer_pretty(&mut sink, &report)?;
        }
        else {
            serde_json::to_writer(&mut sink, &report)?;
        }
        writeln!(sink)?;
        sink.flush().context("could not write report")?;

        if let Some(path) = &self.output {
            info!("Report written to {}", path.display());
        }
        Ok(())
    }
}

fn print_summary(output: &PipelineOutput) {
    for (site, summary) in output.summaries.iter() {
        eprintln!("{}: {}", style(site).green(), summary);
    }
    for cell in output.store.all_cells() {
        let sizes = cell
            .venn_segments()
            .iter()
            .filter(|segment| segment.size() > 0)
            .map(|segment| format!("{} {}", segment, style(segment.size()).cyan()))
            .join(", ");
        eprintln!("{}: {}", style(cell.cell_name()).bold(), sizes);
    }
}
