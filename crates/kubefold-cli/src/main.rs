use std::process::ExitCode;

fn main() -> ExitCode {
    kubefold_cli::run()
}
