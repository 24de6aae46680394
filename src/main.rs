//! randfit main — full batch report by default, or one section via subcommand.
use clap::Parser; // trait import enables RandfitCli::parse()

use randfit::cli::RandfitCli;
use randfit::commands::report;
use randfit::config::{resolve_config_path, Config};
use randfit::debug_log;

fn main() -> anyhow::Result<()> {
    let args = RandfitCli::parse();

    let cfg_path = resolve_config_path(&args.config);
    let mut cfg = Config::load(cfg_path.as_deref(), args.config.is_some())?;
    args.apply(&mut cfg);
    cfg.validate()?;
    debug_log!("config: {:?}", cfg);

    report::run(&cfg, args.sections(), args.json, args.out.as_deref())
}
