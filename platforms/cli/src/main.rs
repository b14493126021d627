use clap::{ArgAction, Parser};
use log::debug;
use ntm_trace::{
    check_input, Explorer, MachineCatalog, MachineLoader, Report, DEFAULT_DEPTH_LIMIT,
};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Simulates a non-deterministic Turing machine on an input string, exploring every branch
/// up to a depth limit.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  ntm-trace machines/ends-in-one.csv --input 0101 --depth-limit 20
  ntm-trace --builtin contains-ab --input bab --json
  printf 'machines/ends-in-one.csv\\n0101\\n20\\n' | ntm-trace")]
struct Cli {
    /// Path to a machine definition file (.csv).
    /// Prompted for on stdin when neither this nor --builtin is given.
    machine: Option<PathBuf>,

    /// Run a built-in machine instead of a file (see --list)
    #[clap(short, long, conflicts_with = "machine")]
    builtin: Option<String>,

    /// List the built-in machines and exit
    #[clap(short, long)]
    list: bool,

    /// The input string to run. Prompted for on stdin when omitted.
    #[clap(short, long)]
    input: Option<String>,

    /// Maximum depth of the configuration tree, at most 10000. Prompted for on stdin when
    /// omitted.
    #[clap(short, long)]
    depth_limit: Option<usize>,

    /// Print the report as JSON
    #[clap(long)]
    json: bool,

    /// Increase log output (-v debug, -vv trace). RUST_LOG overrides this.
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Reads missing run parameters from `input`, writing the question to `prompts` only when a
/// person is typing the answers. Prompts go to stderr so they never mix with the report.
struct Prompter<R, W> {
    input: R,
    prompts: W,
    interactive: bool,
    asked: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn new(input: R, prompts: W, interactive: bool) -> Self {
        Self {
            input,
            prompts,
            interactive,
            asked: false,
        }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        if self.interactive {
            writeln!(self.prompts, "{question}")?;
            self.prompts.flush()?;
        }
        self.asked = true;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        for key in MachineCatalog::names() {
            println!("{key}");
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut prompter = Prompter::new(
        stdin.lock(),
        io::stderr(),
        atty::is(atty::Stream::Stdin),
    );

    let machine = match (&cli.builtin, &cli.machine) {
        (Some(key), _) => MachineCatalog::get(key)?,
        (None, Some(path)) => MachineLoader::load_machine(path)?,
        (None, None) => {
            let path = prompter.ask("Enter the name of the file describing the machine:")?;
            MachineLoader::load_machine(Path::new(&path))?
        }
    };

    let input = match cli.input {
        Some(input) => input,
        None => prompter.ask("Enter the input string to run:")?,
    };

    let depth_limit = match cli.depth_limit {
        Some(limit) => limit,
        None => {
            let answer = prompter.ask("Enter the limit (max depth of the configuration tree):")?;
            if answer.is_empty() {
                DEFAULT_DEPTH_LIMIT
            } else {
                answer
                    .parse()
                    .map_err(|e| format!("Invalid depth limit '{answer}': {e}"))?
            }
        }
    };

    check_input(&machine, &input)?;
    debug!("running {} with depth limit {}", machine.name, depth_limit);

    let outcome = Explorer::new(&machine, depth_limit)?.run(&input);
    let report = Report::new(&machine, &outcome);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        if prompter.asked && prompter.interactive {
            eprintln!();
        }
        print!("{report}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_prompts_go_to_prompt_stream() {
        let mut prompts = Vec::new();
        let mut prompter = Prompter::new("0101\n".as_bytes(), &mut prompts, true);

        let answer = prompter.ask("Enter the input string to run:").unwrap();

        assert_eq!(answer, "0101");
        assert!(prompter.asked);
        assert_eq!(
            String::from_utf8(prompts).unwrap(),
            "Enter the input string to run:\n"
        );
    }

    #[test]
    fn test_piped_answers_are_read_silently() {
        let mut prompts = Vec::new();
        let mut prompter = Prompter::new("20\n".as_bytes(), &mut prompts, false);

        assert_eq!(prompter.ask("Enter the limit:").unwrap(), "20");
        assert!(prompts.is_empty());
    }

    #[test]
    fn test_depth_limit_above_maximum_fails() {
        let cli = Cli::parse_from([
            "ntm-trace",
            "--builtin",
            "right-forever",
            "--input",
            "0",
            "--depth-limit",
            "100000",
        ]);

        let error = run(cli).unwrap_err();
        assert!(error.to_string().contains("exceeds the maximum"));
    }
}
