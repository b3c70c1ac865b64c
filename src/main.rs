use std::process::ExitCode;

fn main() -> ExitCode {
    pydoctree::cli::run()
}
