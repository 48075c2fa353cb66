fn main() {
    kumi::cli::run();
}
