fn main() {
    if let Err(err) = region_label_rs::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
