use structopt::StructOpt;
use typesync_cli::{commands, logging};

#[derive(StructOpt, Debug)]
enum Command {
    #[structopt(name = "sync")]
    /// Add missing type definition packages to the package file
    Sync(commands::SyncOpt),

    #[structopt(name = "config")]
    /// Config related subcommands
    Config(commands::ConfigOpt),

    #[structopt(name = "completions")]
    /// Generate autocompletion scripts for your shell
    Completions(commands::CompletionOpt),
}

fn main() {
    if let Err(e) = logging::set_up_logging() {
        eprintln!("Error: {}", e);
    }

    let args = Command::from_args();

    let result = match args {
        Command::Sync(sync_options) => commands::sync(sync_options),
        Command::Config(config_options) => commands::config(config_options),
        Command::Completions(completion_options) => {
            Command::clap().gen_completions_to(
                "typesync",
                completion_options.shell,
                &mut ::std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(-1);
    }
}
