use std::process;

use redshell::logging;
use redshell::shell::Shell;

fn main() {
    // The shell takes no arguments at all.
    if std::env::args().count() != 1 {
        process::exit(84);
    }

    logging::init();

    let mut shell = Shell::new();
    process::exit(shell.run());
}
