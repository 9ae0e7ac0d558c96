// luaparse: Lua subset parser with a terminal syntax-tree explorer

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use luaparse::parser::ast::Program;
use luaparse::parser::lexer::Token;
use luaparse::parser::outline;
use luaparse::parser::{Diagnostic, Parser};
use luaparse::ui::App;

/// What to do with the parsed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Tokens,
    Tree,
    Check,
    Tui,
}

impl Mode {
    fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "--tokens" => Some(Mode::Tokens),
            "--tree" => Some(Mode::Tree),
            "--check" => Some(Mode::Check),
            "--tui" => Some(Mode::Tui),
            _ => None,
        }
    }
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} <file.lua> [--tokens | --tree | --check | --tui]", program_name);
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  --tokens   Print the token stream");
    eprintln!("  --tree     Print the syntax tree outline");
    eprintln!("  --check    Report diagnostics only");
    eprintln!("  --tui      Explore source, tree and tokens interactively (default)");
    eprintln!();
    eprintln!("Try the sample script:");
    eprintln!("  {} demos/config.lua --tree", program_name);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("luaparse");

    if args.len() < 2 {
        eprintln!("Error: No input file provided");
        eprintln!();
        print_usage(program_name);
        std::process::exit(1);
    }

    let mode = match args.get(2) {
        None => Mode::Tui,
        Some(flag) => match Mode::from_flag(flag) {
            Some(mode) => mode,
            None => {
                eprintln!("Error: Unknown option '{}'", flag);
                print_usage(program_name);
                std::process::exit(1);
            }
        },
    };

    let source_file = &args[1];

    if !Path::new(source_file).exists() {
        eprintln!("Error: File '{}' not found", source_file);
        print_usage(program_name);
        std::process::exit(1);
    }

    // Read source code
    let source = fs::read_to_string(source_file)?;

    // Parse the source code
    eprintln!("Parsing {}...", source_file);
    let mut parser = Parser::new(&source);
    let (program, result) = parser.parse();

    match &result {
        Ok(()) => eprintln!(
            "Parsed successfully. Found {} top-level statements.",
            program.statements.len()
        ),
        Err(e) => {
            eprintln!(
                "Parsed with {} error(s). Found {} top-level statements.",
                e.len(),
                program.statements.len()
            );
            if mode != Mode::Tui {
                eprintln!("{}", e);
            }
        }
    }

    match mode {
        Mode::Tokens => {
            for token in parser.tokens() {
                println!(
                    "{:>8}  {:<8} {}",
                    token.location.to_string(),
                    token.kind.as_str(),
                    token
                );
            }
        }
        Mode::Tree => println!("{}", outline::render(&program)),
        Mode::Check => {}
        Mode::Tui => {
            run_tui(
                source,
                parser.tokens().to_vec(),
                program,
                parser.diagnostics().to_vec(),
            )?;
            return Ok(());
        }
    }

    if result.is_err() {
        std::process::exit(1);
    }

    Ok(())
}

fn run_tui(
    source: String,
    tokens: Vec<Token>,
    program: Program,
    diagnostics: Vec<Diagnostic>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(source, tokens, program, diagnostics);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
