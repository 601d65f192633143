use std::io;

use rf_core::config::Config;
use rf_core::{logging, pipeline};
use rf_protocol::EXIT_SETUP_FAILURE;
use tracing::{debug, error};

fn print_help() {
    println!("ringfence — run an untrusted Rhai program under resource ceilings");
    println!();
    println!("Usage:");
    println!("  ringfence < program.rhai");
    println!();
    println!("Exit status:");
    println!("  0    program completed");
    println!("  1    program failed; one line \"Execution failed: <message>\" on stdout");
    println!("  126  resource limits could not be installed; nothing was run");
    println!("  other / signal: a resource ceiling was exceeded");
    println!();
    println!("Config: $XDG_CONFIG_HOME/ringfence/config.toml");
    println!("Logging: RINGFENCE_LOG (tracing filter, default \"warn\"), written to stderr");
    println!();
    println!("Options:");
    println!("  --version         Print version");
    println!("  --help            Print this help");
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("ringfence {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    logging::init();

    // The runner reports panics as the failure line; keep stderr quiet.
    std::panic::set_hook(Box::new(|info| {
        debug!("panic: {info}");
    }));

    let config = Config::load_or_default();

    let outcome = match pipeline::execute(&config, rf_sandbox::install, io::stdin().lock()) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e}, refusing to run untrusted input");
            std::process::exit(EXIT_SETUP_FAILURE);
        }
    };

    // Write failures are logged inside; the exit status still reports the outcome.
    let _ = pipeline::emit_diagnostic(&mut io::stdout().lock(), &outcome);
    std::process::exit(outcome.exit_code());
}
