use pursebook::{cli::run_cli, output};

fn main() {
    if let Err(err) = run_cli() {
        output::error(&err);
        std::process::exit(1);
    }
}
