use clap::Parser;
use form2list::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "form2list")]
#[command(about = "Walk a directory of Excel forms and collect their values into one Excel list.")]
#[command(long_about = "form2list - Excel forms → Excel list

Scans DIRECTORY recursively for .xlsx forms. For each form, the first input
format in the config whose condition holds decides which cells are read; the
values are then rendered into one row of every output sheet.

CONFIG (spec.yml):
  template: list_template.xlsx      # output skeleton
  columnOffset: 0
  inputFormats:
    - items:
        name: B2
        date: D4
      condition: \"{{ name is not none }}\"
  sheets:
    - name: List
      rowOffset: 1
      columns:
        - value: \"{{ name }}\"
        - value: \"{{ basename }}\"

TEMPLATE VARIABLES:
  fields from items, dirname, basename, stem, path,
  row_number, row, column_number, column, cell

The list is written only if every form matched a format.

EXAMPLES:
  form2list forms/
  form2list -c spec.yml -o list.xlsx -v forms/")]
#[command(version)]
struct Cli {
    /// Conversion config (YAML)
    #[arg(short, long, default_value = "spec.yml", env = "FORM2LIST_CONFIG")]
    config: PathBuf,

    /// Output file (.xlsx); defaults to the config's `output`, then list.xlsx
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show each file, condition and cell write
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the input forms
    directory: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "form2list=debug"
    } else {
        "form2list=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::convert(cli.directory, cli.config, cli.output, cli.verbose)?;
    Ok(())
}
