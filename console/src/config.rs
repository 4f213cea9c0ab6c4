use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use microscopium::prelude::*;

use crate::strings::config as strings;
use crate::utils::{
    open_output,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct ConfigArgs {
    #[arg(short, long, help = strings::OUTPUT)]
    output: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let mut sink = open_output(self.output.as_ref())?;
        serde_json::to_writer_pretty(&mut sink, &PipelineConfig::default())?;
        writeln!(sink)?;
        sink.flush()?;
        Ok(())
    }
}
