use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::{Parser, ValueEnum};
use inkwell::context::Context;
use singularity::{
    ast::{ast::Node, statements::Program},
    compiler::{
        compiler::{compile, CompileOptions},
        llvm::LlvmBackend,
        recording::RecordingBackend,
    },
    demos::{demo, DEMOS},
    errors::errors::{codegen_error, Error},
    format_error,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendChoice {
    /// Build an LLVM module and print its IR
    Llvm,
    /// Record the emitted instructions and print the listing
    Record,
}

/// Singularity - compiles a typed program tree to LLVM IR
#[derive(Parser, Debug)]
#[command(name = "singularity")]
#[command(about = "Compile a bundled demo program to LLVM IR", long_about = None)]
struct Args {
    /// Demo program to compile
    #[arg(long, default_value = "hello")]
    demo: String,

    /// List the bundled demo programs and exit
    #[arg(long)]
    list: bool,

    /// Print the program tree before compiling
    #[arg(long)]
    dump_ast: bool,

    /// Code generation backend
    #[arg(long, value_enum, default_value_t = BackendChoice::Llvm)]
    backend: BackendChoice,

    /// Write the IR to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Name of the function top-level statements are compiled into
    #[arg(long, default_value = "main")]
    entry_point: String,

    /// Skip module verification
    #[arg(long)]
    no_verify: bool,
}

fn run(args: &Args, program: &Program) -> Result<(), Error> {
    let options = CompileOptions {
        entry_point: args.entry_point.clone(),
        verify: !args.no_verify,
    };
    let start = Instant::now();

    match args.backend {
        BackendChoice::Llvm => {
            let context = Context::create();
            let backend = LlvmBackend::new(&context, &args.demo);
            let backend = compile(program, backend, options)?.into_backend();
            info!(elapsed = ?start.elapsed(), "compiled with LLVM");

            match &args.output {
                Some(path) => backend.save_module_to_file(path.clone())?,
                None => print!("{}", backend.print_to_string()),
            }
        }
        BackendChoice::Record => {
            let backend = compile(program, RecordingBackend::new(), options)?.into_backend();
            info!(elapsed = ?start.elapsed(), "compiled with the recording backend");

            let listing = backend.listing();
            match &args.output {
                Some(path) => std::fs::write(path, listing)
                    .map_err(|error| codegen_error(error, path.display().to_string()))?,
                None => print!("{}", listing),
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    use tracing_subscriber::{fmt, EnvFilter};

    // RUST_LOG controls the log level, WARN when unset
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if args.list {
        for name in DEMOS {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    let program = match demo(&args.demo) {
        Some(Ok(program)) => program,
        Some(Err(error)) => {
            eprintln!("{}", format_error(&error));
            return ExitCode::FAILURE;
        }
        None => {
            eprintln!(
                "Unknown demo `{}`, expected one of: {}",
                args.demo,
                DEMOS.join(", ")
            );
            return ExitCode::FAILURE;
        }
    };

    if args.dump_ast {
        eprint!("{}", program.dump());
    }

    match run(&args, &program) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", format_error(&error));
            ExitCode::FAILURE
        }
    }
}
