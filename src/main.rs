fn main() {
    if let Err(err) = calsig::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
