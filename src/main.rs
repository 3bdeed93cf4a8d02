fn main() {
    prereqmap::cli::run();
}
