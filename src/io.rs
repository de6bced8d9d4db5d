use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::memory::byte_value;

/// One simulator command, as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `np <proc> <pages>`
    NewProcess { process: usize, pages: usize },
    /// `kp <proc>`
    KillProcess { process: usize },
    /// `pfm`
    PrintFreeMap,
    /// `ppt <proc>`
    PrintPageTable { process: usize },
    /// `st <proc> <vaddr> <value>`
    Store { process: usize, va: usize, value: u8 },
    /// `lb <proc> <vaddr>`
    Load { process: usize, va: usize },
}

pub const USAGE: &str = "usage: ptsim commands
 -> [np] procNum req_pages
 -> [pfm]
 -> [ppt] procNum
 -> [kp] procNum
 -> [st] procNum virt_addr value
 -> [lb] procNum virt_addr";

/// Parse a flat token list into commands. Nothing is executed until the
/// whole list has parsed.
pub fn parse_commands<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Command>> {
    let mut tokens = tokens.iter().map(|token| AsRef::<str>::as_ref(token));
    let mut commands = Vec::new();

    while let Some(name) = tokens.next() {
        let command = match name {
            "np" => Command::NewProcess {
                process: parse_number(operand(&mut tokens, name, "procNum")?, "process number")?,
                pages: parse_number(operand(&mut tokens, name, "req_pages")?, "page count")?,
            },
            "kp" => Command::KillProcess {
                process: parse_number(operand(&mut tokens, name, "procNum")?, "process number")?,
            },
            "pfm" => Command::PrintFreeMap,
            "ppt" => Command::PrintPageTable {
                process: parse_number(operand(&mut tokens, name, "procNum")?, "process number")?,
            },
            "st" => Command::Store {
                process: parse_number(operand(&mut tokens, name, "procNum")?, "process number")?,
                va: parse_number(operand(&mut tokens, name, "virt_addr")?, "virtual address")?,
                value: parse_value(operand(&mut tokens, name, "value")?)?,
            },
            "lb" => Command::Load {
                process: parse_number(operand(&mut tokens, name, "procNum")?, "process number")?,
                va: parse_number(operand(&mut tokens, name, "virt_addr")?, "virtual address")?,
            },
            other => bail!("Unknown command: {}", other),
        };
        commands.push(command);
    }

    Ok(commands)
}

fn operand<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    command: &str,
    what: &str,
) -> Result<&'a str> {
    tokens
        .next()
        .with_context(|| format!("`{}` is missing its {} operand", command, what))
}

fn parse_number(token: &str, what: &str) -> Result<usize> {
    token.parse().with_context(|| format!("Invalid {}: {}", what, token))
}

fn parse_value(token: &str) -> Result<u8> {
    let value: i64 = token.parse().with_context(|| format!("Invalid value: {}", token))?;
    Ok(byte_value(value)?)
}

/// Read whitespace-separated command tokens from a script file
pub fn read_script<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    Ok(content.split_whitespace().map(str::to_string).collect())
}
