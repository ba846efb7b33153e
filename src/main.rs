mod cli;

fn main() {
    match cli::run() {
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
