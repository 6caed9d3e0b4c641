//! cd - Change directory builtin
//!
//! Supports:
//! - cd [dir] - change to directory
//! - cd - change to HOME
//! - cd - - change to the previous directory (OLDPWD)
//!
//! Keeps the `PWD` and `OLDPWD` table entries current: a missing entry
//! is created, an existing one replaced in place.

use std::fs;
use std::path::Path;

use nix::unistd::{access, chdir, getcwd, AccessFlags};

use crate::env::Environment;

/// Handle the cd builtin command.
pub fn handle_cd(env: &mut Environment, argv: &[String]) -> i32 {
    if argv.len() > 2 {
        eprintln!("cd: Too many arguments");
        return 84;
    }

    let previous = current_pwd(env);

    if argv.len() == 1 {
        let Some(home) = env.get("HOME").map(String::from) else {
            eprintln!("cd: No home directory.");
            return 84;
        };
        if chdir(Path::new(&home)).is_err() {
            eprintln!("{}: No such file or directory.", home);
            return 84;
        }
        record_move(env, previous, home);
        return 0;
    }

    let target = &argv[1];
    if target == "-" {
        let Some(old) = env.get("OLDPWD").map(String::from) else {
            eprintln!(": No such file or directory.");
            // The historical shell reports success here.
            return 0;
        };
        let _ = chdir(Path::new(&old));
        let landed = cwd_string();
        record_move(env, previous, landed);
        return 0;
    }

    let metadata = match fs::metadata(target) {
        Ok(metadata) => metadata,
        Err(_) => {
            eprintln!("{}: No such file or directory.", target);
            return 84;
        }
    };
    if !metadata.is_dir() {
        eprintln!("{}: Not a directory.", target);
        return 84;
    }
    if access(Path::new(target), AccessFlags::R_OK).is_err() || chdir(Path::new(target)).is_err() {
        eprintln!("{}: Permission denied.", target);
        return 84;
    }

    let landed = cwd_string();
    record_move(env, previous, landed);
    0
}

/// The directory we are leaving: the `PWD` entry when tracked, the
/// kernel's answer otherwise.
fn current_pwd(env: &Environment) -> String {
    env.get("PWD").map(String::from).unwrap_or_else(cwd_string)
}

fn cwd_string() -> String {
    getcwd()
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Commit a completed directory change to the table and the mirrors.
fn record_move(env: &mut Environment, previous: String, new_pwd: String) {
    env.set("OLDPWD", &previous);
    env.set("PWD", &new_pwd);
    env.old_pwd = Some(previous);
    env.pwd = Some(new_pwd);
}
