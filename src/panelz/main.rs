//! The `panelz` binary. Everything user-facing lives in `cli/`; this file only
//! runs it and turns an error into a red `Error:` line and exit code 1.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        cli::render::print_error(&e);
        std::process::exit(1);
    }
}
