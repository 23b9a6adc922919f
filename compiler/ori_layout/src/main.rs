//! Ori layout inspector.
//!
//! Prints single-payload enum layouts and the byte patterns of their cases.

use ori_layout::commands::{parse_command, run_command};
use ori_layout::{init_tracing, LayoutConfig};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || matches!(args[0].as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let result = LayoutConfig::from_env()
        .and_then(|config| parse_command(&args, config))
        .and_then(|command| run_command(&command));

    match result {
        Ok(report) => println!("{report}"),
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Run 'ori-layout help' for usage.");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Ori layout inspector");
    println!();
    println!("Usage: ori-layout <command> [options]");
    println!();
    println!("Commands:");
    println!("  size <payload-size>                 Show size, stride, and tag bytes");
    println!("  encode <payload-size> <case>        Print the bytes storing <case>");
    println!("  decode <payload-size> <hex-bytes>   Print the case stored in <hex-bytes>");
    println!();
    println!("Options:");
    println!("  --cases=<n>           Number of empty cases (default: 1)");
    println!("  --xi=<n>              Reserve the payload's top <n> values as extra inhabitants");
    println!("  --align=<n>           Payload alignment for opaque payloads (default: 1)");
    println!("  --byte-order=<order>  little, big, or native (default: $ORI_BYTE_ORDER or native)");
    println!("  --fill=<hex>          Initial buffer contents for encode");
    println!();
    println!("Set RUST_LOG=ori_layout=debug to trace layout derivation.");
}
