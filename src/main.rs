mod cli;
mod commands;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("error ({}): {err}", err.kind());
        std::process::exit(1);
    }
}
