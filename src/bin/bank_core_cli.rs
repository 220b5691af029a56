use bank_core::cli::{output, run_cli};

fn main() {
    if let Err(err) = run_cli(std::env::args().skip(1)) {
        output::error(err);
        std::process::exit(1);
    }
}
