use std::process::ExitCode;

fn main() -> ExitCode {
    urlqr::cli::run(std::env::args_os())
}
