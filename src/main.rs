use std::{
    fs::{self, read_to_string},
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use palc::{Parser, Subcommand};
use scriptc::{
    binder::binder::BinderOptions,
    compilation::Compilation,
    errors::diagnostics::{Diagnostic, DiagnosticBag},
    evaluator::evaluator::Variables,
    get_line_at_position,
};

#[derive(Parser)]
#[command(name = "scriptc", after_long_help = "Binds, lowers and evaluates scripts.")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run a source file
    File {
        path: PathBuf,
        /// Print the lowered program before running it
        #[arg(long)]
        show_program: bool,
        /// Write the control flow graph in DOT format to this path
        #[arg(long)]
        graph: Option<PathBuf>,
        /// Assigning to an undeclared variable is an error
        #[arg(long)]
        strict: bool,
    },
    /// Interactive prompt
    Repl {
        /// Assigning to an undeclared variable is an error
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().mode {
        Mode::File { path, show_program, graph, strict } => {
            run_file(&path, show_program, graph, binder_options(strict))
        }
        Mode::Repl { strict } => run_repl(binder_options(strict)),
    }
}

fn binder_options(strict: bool) -> BinderOptions {
    BinderOptions {
        implicit_declarations: !strict,
        ..BinderOptions::default()
    }
}

fn run_file(path: &PathBuf, show_program: bool, graph: Option<PathBuf>, options: BinderOptions) -> Result<()> {
    let source = read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let compilation = Compilation::compile(&source, &file_name, options);

    if show_program {
        let mut out = String::new();
        compilation.emit_tree(&mut out)?;
        print!("{out}");
    }

    if let Some(graph) = graph {
        let mut out = String::new();
        compilation.write_control_flow_graph(&mut out)?;
        fs::write(&graph, out).with_context(|| format!("Failed to write {}", graph.display()))?;
    }

    let mut variables = Variables::new();
    let result = compilation.evaluate(&mut variables);

    if !result.diagnostics.is_empty() {
        display_diagnostics(&result.diagnostics, &source, &path.display().to_string());
        bail!("{} error(s) in {}", result.diagnostics.len(), file_name);
    }

    result.value?;
    Ok(())
}

fn run_repl(options: BinderOptions) -> Result<()> {
    let mut previous: Option<Compilation> = None;
    let mut variables = Variables::new();
    let mut show_program = false;
    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        input.clear();
        print!("> ");
        io::stdout().flush().context("Failed flush")?;

        if stdin.read_line(&mut input).context("Failed read line")? == 0 {
            println!("\nExited scriptc repl");
            return Ok(());
        }

        let line = input.trim();
        match line {
            "" => continue,
            "#exit" => return Ok(()),
            "#program" => {
                show_program = !show_program;
                println!("{}", if show_program { "Showing lowered program." } else { "Not showing lowered program." });
                continue;
            }
            "#reset" => {
                previous = None;
                variables.clear();
                continue;
            }
            _ => {}
        }

        let compilation = match &previous {
            Some(previous) => previous.continue_with(line, "<repl>"),
            None => Compilation::compile(line, "<repl>", options),
        };

        if show_program {
            let mut out = String::new();
            compilation.emit_tree(&mut out)?;
            print!("{out}");
        }

        let result = compilation.evaluate(&mut variables);
        if !result.diagnostics.is_empty() {
            display_diagnostics(&result.diagnostics, line, "<repl>");
            continue;
        }

        match result.value {
            Ok(Some(value)) => println!("{value}"),
            Ok(None) => {}
            Err(e) => eprintln!("Runtime error: {e}"),
        }

        // Only submissions that bound cleanly become visible to later ones
        previous = Some(compilation);
    }
}

fn display_diagnostics(diagnostics: &DiagnosticBag, source: &str, file: &str) {
    for diagnostic in diagnostics {
        display_diagnostic(diagnostic, source, file);
    }
}

fn display_diagnostic(diagnostic: &Diagnostic, source: &str, file: &str) {
    /*
        Error: message
        -> final.sc
           |
        20 | let a = #;
           | --------^
    */

    println!("Error: {}", diagnostic.message());
    println!("-> {}", file);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, diagnostic.span.start.0) else {
        return;
    };

    let line_str = line.to_string();
    let padding = line_str.len() + 2;

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_str, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.len() - string.trim_start_matches([' ', '\t']).len();
    (String::from(&string[start..]), start)
}
