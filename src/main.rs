fn main() {
    if let Err(e) = siriwave::app::run() {
        tracing::error!("Exiting with error: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
