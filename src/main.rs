#![deny(clippy::all)]
#![warn(clippy::pedantic)]

use portprobe::address::TargetAddress;
use portprobe::benchmark::{Benchmark, NamedTimer};
use portprobe::input::{Config, Opts};
use portprobe::port_spec::{self, PortScope};
use portprobe::scanner::{transport::TcpTransport, Prober, Scanner};
use portprobe::session::NetworkSession;
use portprobe::{detail, output, warning};

use anyhow::Context;
use log::{debug, info};
use std::io;
use std::process;
use std::time::Duration;

#[cfg(not(tarpaulin_include))]
/// Reads the command line arguments and runs one scan.
/// Invalid input ends the process with status 1 before any probe is sent;
/// per-port errors are reported inline and do not change the exit status.
fn main() {
    env_logger::init();
    let mut benchmarks = Benchmark::init();
    let mut portprobe_bench = NamedTimer::start("portprobe");

    let mut opts = Opts::read();
    debug!("Main() `opts` arguments are {opts:?}");

    if let Err(e) = run(&mut opts, &mut benchmarks) {
        warning!(format!("ERROR: ({e:#})"), opts.greppable, opts.accessible);
        process::exit(1);
    }

    portprobe_bench.end();
    benchmarks.push(portprobe_bench);
    debug!("{}", benchmarks.summary());
}

#[cfg(not(tarpaulin_include))]
fn run(opts: &mut Opts, benchmarks: &mut Benchmark) -> anyhow::Result<()> {
    if !opts.no_config {
        let config = Config::read(opts.config_path.clone())?;
        opts.merge(&config);
    }

    opts.prompt_missing(&mut io::stdin().lock(), &mut io::stdout())
        .context("could not read scan parameters")?;

    let target = TargetAddress::parse(opts.address.as_deref().unwrap_or_default())?;
    let ports = port_spec::parse(opts.ports.as_deref().unwrap_or_default())?;

    let notice = match ports.scope() {
        PortScope::Single(port) => format!("Only one port provided. Checking port: {port}"),
        PortScope::Range { start, end } => format!("Scanning ports from {start} to {end}..."),
    };
    detail!(notice, opts.greppable, opts.accessible);

    let session = NetworkSession::start().context("network stack initialisation failed")?;
    let prober = Prober::new(TcpTransport, opts.timeout.map(Duration::from_millis));
    let mut scanner = Scanner::new(prober, target, ports, opts.greppable, opts.accessible);

    output!("Initiating port scan...", opts.greppable, opts.accessible);
    let mut scan_bench = NamedTimer::start("Portscan");
    let reports = session.block_on(scanner.run());
    scan_bench.end();
    benchmarks.push(scan_bench);

    let open = reports
        .iter()
        .filter(|report| report.outcome.is_open())
        .count();
    info!("{open} of {} ports open on {target}", reports.len());

    Ok(())
}
