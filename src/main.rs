#[macro_use]
extern crate tracing;

use clap::Parser;
use cmd::{context::Ctx, context::RegistryArgs, delete::Delete, tags::Tags};

mod cmd;

#[derive(Parser, Debug)]
#[command(version, about = "A command-line docker registry client.", long_about = None)]
struct Args {
    #[clap(flatten)]
    registry: RegistryArgs,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    Tags(Tags),
    Delete(Delete),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let ctx = Ctx::init(&args.registry)?;

    match args.command {
        Commands::Tags(cmd) => cmd.run(&ctx).await?,
        Commands::Delete(cmd) => cmd.run(&ctx).await?,
    }
    Ok(())
}
