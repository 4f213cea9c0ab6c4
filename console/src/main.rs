mod config;
mod run;
mod strings;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use config::ConfigArgs;
use run::RunArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Merge the site tables and write the aggregate report.
    Run {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  RunArgs,
    },

    /// Print the default run configuration as JSON.
    Config {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ConfigArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Run { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Config { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
