use std::process::ExitCode;

fn main() -> ExitCode {
    match flashkit_cli::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
