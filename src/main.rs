//! ptsim - Page Table Simulator
//!
//! Usage: ptsim [OPTIONS] [COMMAND]...
//!
//! Commands:
//!   np <proc> <pages>          - Create a process with a page table and data pages
//!   kp <proc>                  - Kill a process and free its frames
//!   pfm                        - Print the page free map
//!   ppt <proc>                 - Print a process's page table
//!   st <proc> <vaddr> <value>  - Store a byte at a virtual address
//!   lb <proc> <vaddr>          - Load a byte from a virtual address
//!
//! Options:
//!   -v, --verbose         Print diagnostics to stderr (repeat for more)
//!       --all-or-nothing  Roll back a process that cannot get all its pages
//!       --script <FILE>   Read commands from a file before the positional ones

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgAction, Parser};

use ptsim::io::{USAGE, parse_commands, read_script};
use ptsim::{CreationPolicy, VmManager, logger};

#[derive(Parser)]
#[command(name = "ptsim")]
#[command(about = "Page table simulator - 64 frames of 256 bytes, one page table per process")]
#[command(after_help = USAGE)]
struct Args {
    /// Print diagnostics to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Tear down a process whose data pages cannot all be allocated
    #[arg(long)]
    all_or_nothing: bool,

    /// Read whitespace-separated commands from a file
    #[arg(long)]
    script: Option<PathBuf>,

    /// Commands to run, in order
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    commands: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.commands.is_empty() && args.script.is_none() {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    logger::init(logger::level_for_verbosity(args.verbose))?;

    run(&args)
}

/// Parse everything up front, then execute commands one at a time. A failed
/// command is reported and the run continues.
fn run(args: &Args) -> Result<()> {
    let mut tokens = match &args.script {
        Some(path) => read_script(path)?,
        None => Vec::new(),
    };
    tokens.extend(args.commands.iter().cloned());

    let commands = parse_commands(&tokens)?;

    let policy = if args.all_or_nothing {
        CreationPolicy::AllOrNothing
    } else {
        CreationPolicy::Partial
    };
    let mut vm = VmManager::new(policy);
    log::debug!("running {} commands, creation policy {:?}", commands.len(), vm.policy());

    for command in &commands {
        match vm.execute(command) {
            Ok(Some(report)) => print!("{}", report),
            Ok(None) => {}
            Err(e) => {
                log::debug!("{:?} failed: {:?}", command, e);
                println!("{}", e);
            }
        }
    }

    Ok(())
}
