use std::process::ExitCode;

use log::{error, info};
use rhdl::prelude::*;
use pe_core::{deliveries, simulate, Delivery, Operands, PeInput, MAC_LATENCY};

// afiseaza erorile rhdl cu sursa kernelului
fn miette_report(err: RHDLError) -> String {
    let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    let mut msg = String::new();
    if handler.render_report(&mut msg, &err).is_err() {
        msg = format!("{err}");
    }
    msg
}

// true daca fiecare job a livrat exact rezultatul asteptat
fn run_simulation() -> Result<bool, RHDLError> {
    info!("--- systolic PE simulation ---");

    // scenariul din mediul de verificare: 5*4+0, 10*3+5, 7*8+10
    let jobs = [
        Operands::new(5, 4, 0),
        Operands::new(10, 3, 5),
        Operands::new(7, 8, 10),
    ];

    let mut inputs = Vec::new();

    // -- Etapa 1: reset 5 cicluri + un ciclu liber --
    for _ in 0..5 {
        inputs.push(PeInput::reset());
    }
    inputs.push(PeInput::idle());

    for ops in jobs {
        // -- Etapa 2: strobe un singur ciclu --
        inputs.push(PeInput::offer(ops));

        // -- Etapa 3: calcul + un ciclu de back-pressure --
        for _ in 0..MAC_LATENCY + 1 {
            inputs.push(PeInput::hold(ops));
        }

        // -- Etapa 4: consumatorul accepta --
        inputs.push(PeInput::idle().with_ready(true));
    }
    inputs.push(PeInput::idle());

    let trace = simulate(inputs)?;
    let done = deliveries(&trace)?;

    let ok = check_deliveries(&jobs, &done)?;
    info!("{} jobs in {} cycles", done.len(), trace.len());

    Ok(ok)
}

// fiecare job are exact un rezultat, egal cu acc + data * weight
fn check_deliveries(jobs: &[Operands], done: &[Delivery]) -> Result<bool, RHDLError> {
    let mut ok = done.len() == jobs.len();
    if !ok {
        error!("{} results for {} jobs", done.len(), jobs.len());
    }

    for (ops, delivery) in jobs.iter().zip(done) {
        let expected = ops.expected()?;
        info!(
            "MAC {:?} -> {} (expected {}, latency {:?} cycles)",
            ops, delivery.result, expected, delivery.latency()
        );
        if delivery.result != expected {
            error!("mismatch: expected {}, got {}", expected, delivery.result);
            ok = false;
        }
    }

    Ok(ok)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run_simulation() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", miette_report(e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivered(result: i64) -> Delivery {
        Delivery { accepted_at: Some(0), first_valid: MAC_LATENCY, result }
    }

    #[test]
    fn missing_or_wrong_results_fail_the_demo() {
        let jobs = [Operands::new(5, 4, 0), Operands::new(10, 3, 5)];

        assert!(check_deliveries(&jobs, &[delivered(20), delivered(35)]).unwrap());
        // un rezultat lipsa nu mai e ascuns de zip
        assert!(!check_deliveries(&jobs, &[delivered(20)]).unwrap());
        assert!(!check_deliveries(&jobs, &[delivered(20), delivered(36)]).unwrap());
    }

    #[test]
    fn reference_scenario_passes() {
        assert!(run_simulation().unwrap());
    }
}
