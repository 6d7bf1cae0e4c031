use std::process;

use getopts::Options;
use log::error;

const DEFAULT_PORT: u16 = 8000;

fn usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {program} [-p PORT]");
    eprint!("{}", opts.usage(&brief));
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = &args[0];

    let mut opts = Options::new();
    opts.optopt(
        "p",
        "port",
        &format!("TCP port to listen on (default {DEFAULT_PORT})"),
        "PORT",
    );

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(err) => {
            eprintln!("{err}");
            usage(program, &opts);
            process::exit(2);
        }
    };

    let port = match matches.opt_str("p") {
        None => DEFAULT_PORT,
        Some(value) => match value.parse() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("invalid port: {value}");
                usage(program, &opts);
                process::exit(2);
            }
        },
    };

    if let Err(err) = temphum::run(port) {
        error!("{err}");
        process::exit(1);
    }
}
