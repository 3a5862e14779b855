fn main() {
    #[cfg(feature = "cli")]
    histdelta::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("histdelta: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
