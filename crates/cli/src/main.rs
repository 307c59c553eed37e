use std::process::ExitCode;

fn main() -> ExitCode {
    recmatch_cli::run()
}
