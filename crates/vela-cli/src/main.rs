use std::process::ExitCode;

use smol_str::SmolStr;
use vela_diag::{Diagnostics, Severity};
use vela_lexer::{KeywordVersion, Token, TokenKind};
use vela_preprocess::{Preprocessor, PreprocessorOptions};
use vela_source::SourceManager;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        usage();
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "dump-tokens" => run(&args[2..], Command::DumpTokens),
        "preprocess" => run(&args[2..], Command::Preprocess),
        other => {
            eprintln!("Unknown command: {other}");
            usage();
            ExitCode::FAILURE
        }
    }
}

fn usage() {
    eprintln!("Usage: vela <command> [options] <file>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  dump-tokens <file>   Print the preprocessed token stream");
    eprintln!("  preprocess <file>    Print the preprocessed source text");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -I <dir>             Add a user include directory");
    eprintln!("  --isystem <dir>      Add a system include directory");
    eprintln!("  -D NAME[=VALUE]      Predefine a macro");
    eprintln!("  --keywords <ver>     Keyword version (e.g. 1800-2023)");
}

enum Command {
    DumpTokens,
    Preprocess,
}

fn run(args: &[String], command: Command) -> ExitCode {
    let mut sm = SourceManager::new();
    let mut options = PreprocessorOptions::default();
    let mut file = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-I" | "--isystem" => {
                let system = args[i] == "--isystem";
                i += 1;
                let Some(dir) = args.get(i) else {
                    eprintln!("Error: {} requires a directory", args[i - 1]);
                    return ExitCode::FAILURE;
                };
                if system {
                    sm.add_system_directory(dir);
                } else {
                    sm.add_user_directory(dir);
                }
            }
            "-D" => {
                i += 1;
                let Some(def) = args.get(i) else {
                    eprintln!("Error: -D requires NAME[=VALUE]");
                    return ExitCode::FAILURE;
                };
                let (name, value) = match def.split_once('=') {
                    Some((n, v)) => (n, v),
                    None => (def.as_str(), "1"),
                };
                options
                    .predefines
                    .push((SmolStr::new(name), SmolStr::new(value)));
            }
            "--keywords" => {
                i += 1;
                let version = args.get(i).and_then(|v| KeywordVersion::from_str(v));
                let Some(version) = version else {
                    eprintln!("Error: --keywords requires a known version string");
                    return ExitCode::FAILURE;
                };
                options.keyword_version = version;
            }
            other => {
                if file.replace(other.to_string()).is_some() {
                    eprintln!("Error: more than one input file");
                    return ExitCode::FAILURE;
                }
            }
        }
        i += 1;
    }

    let Some(file) = file else {
        eprintln!("Error: no input file");
        return ExitCode::FAILURE;
    };

    let buffer = match sm.read_source(std::path::Path::new(&file)) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error reading {file}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut diags = Diagnostics::new();
    let mut tokens = Vec::new();
    let mut fatal = None;
    {
        let mut pp = Preprocessor::new(&mut sm, &mut diags, options);
        pp.push_source(&buffer);
        loop {
            match pp.next() {
                Ok(tok) => {
                    let eof = tok.is_eof();
                    tokens.push(tok);
                    if eof {
                        break;
                    }
                }
                Err(f) => {
                    fatal = Some(f);
                    break;
                }
            }
        }
    }
    if let Some(f) = fatal {
        diags.push(f.diagnostic);
    }

    match command {
        Command::DumpTokens => dump_tokens(&sm, &tokens),
        Command::Preprocess => print_text(&tokens),
    }

    print_diagnostics(&sm, &diags);
    if diags.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn dump_tokens(sm: &SourceManager, tokens: &[Token]) {
    for tok in tokens {
        let line = sm.get_line_number(tok.location);
        let col = sm.get_column_number(tok.location);
        let name = sm.get_file_name(tok.location);
        let origin = if sm.is_macro_loc(tok.location) {
            match sm.get_macro_name(tok.location) {
                Some(m) => format!(" (from `{m})"),
                None => String::from(" (expanded)"),
            }
        } else {
            String::new()
        };
        println!("{name}:{line}:{col}: {:?} {:?}{origin}", tok.kind, tok.text);
    }
}

fn print_text(tokens: &[Token]) {
    let mut out = String::new();
    for tok in tokens {
        for trivia in &tok.trivia {
            if trivia.kind != vela_lexer::TriviaKind::Directive {
                out.push_str(&trivia.text);
            }
        }
        if tok.kind != TokenKind::EndOfFile {
            out.push_str(&tok.text);
        }
    }
    print!("{out}");
}

fn print_diagnostics(sm: &SourceManager, diags: &Diagnostics) {
    for d in diags.iter() {
        let severity = match d.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let name = sm.get_file_name(d.location);
        let line = sm.get_line_number(d.location);
        let col = sm.get_column_number(d.location);
        let args = if d.args.is_empty() {
            String::new()
        } else {
            format!(": {}", d.args.join(", "))
        };
        eprintln!("{name}:{line}:{col}: {severity}[{}]{args}", d.code);
    }
}
