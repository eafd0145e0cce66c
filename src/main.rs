fn main() {
    distropkg::run_cli();
}
