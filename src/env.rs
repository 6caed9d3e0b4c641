//! Environment Store
//!
//! The shell's private copy of the process environment: an ordered list
//! of `KEY=VALUE` entries with unique keys. Insertion order is what
//! `env` prints. Built-ins are the only mutators; children receive a
//! snapshot materialised just before `execve`.

use std::ffi::CString;
use std::io::{self, Write};

/// Ordered, unique-keyed `KEY=VALUE` table plus working-directory
/// mirrors kept in sync by `cd`. The table entries stay authoritative
/// for `PWD` and `OLDPWD`; the mirrors are a convenience for the REPL.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    entries: Vec<String>,
    pub pwd: Option<String>,
    pub old_pwd: Option<String>,
}

impl Environment {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copy the inherited process environment at startup.
    pub fn from_inherited() -> Self {
        let entries = std::env::vars()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        Self { entries, pwd: None, old_pwd: None }
    }

    /// Build a table from preformatted `KEY=VALUE` entries.
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut env = Self::new();
        for entry in entries {
            match entry.split_once('=') {
                Some((key, value)) => env.set(key, value),
                None => env.set(&entry, ""),
            }
        }
        env
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index_of(key).map(|i| &self.entries[i][key.len() + 1..])
    }

    /// Position of `key` in the table, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry_matches(entry, key))
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Insert `key=value`, replacing in place when the key exists so the
    /// entry keeps its original position.
    pub fn set(&mut self, key: &str, value: &str) {
        let entry = format!("{}={}", key, value);
        match self.index_of(key) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove the entry for `key`. Returns whether it was present.
    /// Every other entry keeps its relative order.
    pub fn unset(&mut self, key: &str) -> bool {
        match self.index_of(key) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Write every entry, newline-terminated, in insertion order.
    pub fn print_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "{}", entry)?;
        }
        Ok(())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The child-facing snapshot handed to `execve`. Lives only for the
    /// duration of the exec call. Entries with interior NUL bytes cannot
    /// cross the syscall boundary and are skipped.
    pub fn snapshot_cstrings(&self) -> Vec<CString> {
        self.entries
            .iter()
            .filter_map(|entry| CString::new(entry.as_str()).ok())
            .collect()
    }
}

fn entry_matches(entry: &str, key: &str) -> bool {
    entry.len() > key.len()
        && entry.as_bytes()[key.len()] == b'='
        && &entry[..key.len()] == key
}
