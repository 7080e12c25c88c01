mod commands;

fn main() {
    commands::app().run(std::env::args());
}
