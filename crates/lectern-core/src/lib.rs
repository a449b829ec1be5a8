pub mod api;
pub mod calendar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod lecture;
pub mod projection;
pub mod render;
pub mod state;
pub mod store;
pub mod view;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = cli::GlobalCli::parse_from(
    raw_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting lectern CLI"
  );

  let cfg = config::Config::load(
    cli.config.as_deref()
  )?;

  let data_dir =
    config::resolve_data_dir(
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;

  let store =
    store::StateStore::open(&data_dir)
      .with_context(|| {
        format!(
          "failed to open state store \
           at {}",
          data_dir.display()
        )
      })?;

  let mut renderer =
    render::Renderer::new(&cfg);

  commands::dispatch(
    &store,
    &cfg,
    &mut renderer,
    cli.command,
    calendar::today()
  )?;

  info!("done");
  Ok(())
}
