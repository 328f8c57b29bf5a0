mod data_loader;
mod driver;
mod error;
mod matmul;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use crate::driver::Schedule;
use crate::error::HostError;

#[derive(Parser, Debug)]
#[command(name = "pe_host", about = "Drive MAC jobs through the systolic PE model")]
struct Args {
    /// CSV file with a `data,weight,acc` header; the reference jobs run when omitted
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Cycles the consumer withholds ready after each result appears
    #[arg(long, default_value_t = 1)]
    stall: usize,

    /// Also fold an n x n matrix product through the PE and check it
    #[arg(long)]
    matmul: Option<usize>,
}

fn run(args: &Args) -> Result<(), HostError> {
    let schedule = Schedule::new(args.stall);

    // 1. job-urile
    let jobs = match &args.jobs {
        Some(path) => data_loader::load_jobs(path)?,
        None => data_loader::reference_jobs(),
    };
    info!("{} jobs, consumer stall {} cycles", jobs.len(), schedule.stall);

    // 2. simulare + verificare
    let start = Instant::now();
    let results = driver::run_jobs(&jobs, &schedule)?;
    for (job, result) in jobs.iter().zip(&results) {
        info!("{} * {} + {} = {}", job.data, job.weight, job.acc, result);
    }
    driver::verify(&jobs, &results)?;
    info!("all {} results match, simulated in {:.2?}", results.len(), start.elapsed());

    // 3. produs matricial optional
    if let Some(n) = args.matmul {
        let (a, b) = matmul::demo_matrices(n);
        let start = Instant::now();
        let c = matmul::matmul_on_pe(&a, &b, &schedule)?;
        let expected = matmul::reference_product(&a, &b);

        if let Some(err) = matmul::first_mismatch(&c, &expected) {
            error!("PE product:{}reference:{}", c, expected);
            return Err(err);
        }
        info!("{n}x{n} product matches reference in {:.2?}{}", start.elapsed(), c);
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(HostError::Simulation(e)) => {
            let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
            let mut msg = String::new();
            if handler.render_report(&mut msg, &e).is_err() {
                msg = e.to_string();
            }
            error!("{}", msg);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
