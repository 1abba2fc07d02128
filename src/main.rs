fn main() {
    if let Err(err) = grid_labels::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
