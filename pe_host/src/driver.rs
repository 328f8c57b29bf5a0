use log::{debug, warn};

use pe_core::{acceptances, deliveries, held_result, simulate, Cycle, PeInput, MAC_LATENCY};

use crate::data_loader::MacJob;
use crate::error::HostError;

// cicluri de reset la pornire, ca in mediul de verificare
pub const RESET_CYCLES: usize = 5;

// cat asteptam output_valid dupa acceptare
pub const TIMEOUT_CYCLES: usize = 20;

// planificare open-loop: latenta e constanta, deci stim cand unitatea e libera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    // cicluri in care consumatorul tine rezultatul blocat
    pub stall: usize,
}

impl Default for Schedule {
    fn default() -> Self {
        Self { stall: 1 }
    }
}

impl Schedule {
    pub fn new(stall: usize) -> Self {
        Self { stall }
    }

    // cicluri ocupate de un job, de la strobe pana dupa ready
    pub fn cycles_per_job(&self) -> usize {
        1 + MAC_LATENCY + self.stall + 1
    }

    pub fn stimulus(&self, jobs: &[MacJob]) -> Vec<PeInput> {
        let mut inputs = Vec::with_capacity(RESET_CYCLES + 1 + jobs.len() * self.cycles_per_job() + 1);

        // t0-t4: reset, apoi un ciclu liber
        for _ in 0..RESET_CYCLES {
            inputs.push(PeInput::reset());
        }
        inputs.push(PeInput::idle());

        for job in jobs {
            let ops = job.operands();

            // strobe un singur ciclu, unitatea e libera
            inputs.push(PeInput::offer(ops));

            // calcul + back-pressure, datele raman pe fire
            for _ in 0..MAC_LATENCY + self.stall {
                inputs.push(PeInput::hold(ops));
            }

            // consumatorul ia rezultatul, unitatea redevine libera pe acelasi front
            inputs.push(PeInput::hold(ops).with_ready(true));
        }

        inputs.push(PeInput::idle());
        inputs
    }
}

// ruleaza job-urile prin PE si intoarce rezultatele in ordine
pub fn run_jobs(jobs: &[MacJob], schedule: &Schedule) -> Result<Vec<i64>, HostError> {
    let inputs = schedule.stimulus(jobs);
    debug!("{} jobs -> {} stimulus cycles", jobs.len(), inputs.len());

    let trace = simulate(inputs)?;
    let done = deliveries(&trace)?;

    if let Some(stuck) = held_result(&trace)? {
        warn!("result {} still held at end of run", stuck);
    }

    // timeout-ul inainte de numarare: un job care nu termina explica rezultatele lipsa
    if let Some(index) = first_timeout(&trace, TIMEOUT_CYCLES) {
        return Err(HostError::Timeout {
            index,
            limit: TIMEOUT_CYCLES,
        });
    }

    if done.len() != jobs.len() {
        return Err(HostError::ResultCount {
            offered: jobs.len(),
            delivered: done.len(),
        });
    }

    Ok(done.iter().map(|d| d.result).collect())
}

// primul job acceptat fara output_valid in `limit` cicluri
// un job acceptat prea aproape de finalul trace-ului nu e considerat timeout
pub fn first_timeout(trace: &[Cycle], limit: usize) -> Option<usize> {
    acceptances(trace).into_iter().position(|at| {
        let window_end = at + limit;
        window_end < trace.len() && !trace[at..=window_end].iter().any(|c| c.output.output_valid)
    })
}

// compara cu modelul de referinta
pub fn verify(jobs: &[MacJob], results: &[i64]) -> Result<(), HostError> {
    if jobs.len() != results.len() {
        return Err(HostError::ResultCount {
            offered: jobs.len(),
            delivered: results.len(),
        });
    }

    for (index, (job, &actual)) in jobs.iter().zip(results).enumerate() {
        let expected = job.expected();
        if expected != actual {
            return Err(HostError::Mismatch { index, expected, actual });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loader::reference_jobs;
    use pe_core::PeOutput;
    use pretty_assertions::assert_eq;

    #[test]
    fn stimulus_layout() {
        let schedule = Schedule::new(2);
        let jobs = reference_jobs();
        let inputs = schedule.stimulus(&jobs);

        assert_eq!(inputs.len(), RESET_CYCLES + 1 + 3 * schedule.cycles_per_job() + 1);
        assert!(inputs[..RESET_CYCLES].iter().all(|i| i.reset));

        // un singur strobe per job
        let strobes = inputs.iter().filter(|i| i.input_valid).count();
        assert_eq!(strobes, jobs.len());
        let readies = inputs.iter().filter(|i| i.consumer_ready).count();
        assert_eq!(readies, jobs.len());
    }

    #[test]
    fn reference_jobs_run_through_pe() {
        let jobs = reference_jobs();
        let results = run_jobs(&jobs, &Schedule::default()).unwrap();
        assert_eq!(results, vec![20, 35, 66]);
        verify(&jobs, &results).unwrap();
    }

    #[test]
    fn long_stall_keeps_results() {
        let jobs = vec![MacJob::new(-12, 9, 100), MacJob::new(127, -128, 0)];
        let results = run_jobs(&jobs, &Schedule::new(12)).unwrap();
        assert_eq!(results, vec![-8, -16256]);
    }

    #[test]
    fn accumulator_extremes_verify() {
        let jobs = vec![MacJob::new(1, 1, i32::MAX), MacJob::new(-128, -128, i32::MAX)];
        let results = run_jobs(&jobs, &Schedule::default()).unwrap();
        assert_eq!(results, vec![i32::MAX as i64 + 1, i32::MAX as i64 + 16384]);
        verify(&jobs, &results).unwrap();
    }

    fn cycle(input_busy: bool, output_valid: bool) -> Cycle {
        Cycle {
            input: PeInput::idle(),
            output: PeOutput {
                input_busy,
                output_valid,
                ..PeOutput::default()
            },
        }
    }

    #[test]
    fn stuck_job_times_out() {
        // primul job termina normal, al doilea ramane ocupat fara valid
        let mut trace = vec![cycle(false, false), cycle(true, false), cycle(true, false)];
        trace.extend(vec![cycle(true, true); 2]);
        trace.push(cycle(false, false));
        trace.extend(vec![cycle(true, false); TIMEOUT_CYCLES + 1]);

        assert_eq!(first_timeout(&trace, TIMEOUT_CYCLES), Some(1));
        let err = HostError::Timeout { index: 1, limit: TIMEOUT_CYCLES };
        assert!(err.to_string().contains("20 cycles"));
    }

    #[test]
    fn slow_result_within_limit_is_not_a_timeout() {
        let mut trace = vec![cycle(false, false)];
        trace.extend(vec![cycle(true, false); TIMEOUT_CYCLES]);
        trace.push(cycle(true, true));
        trace.push(cycle(false, false));
        assert_eq!(first_timeout(&trace, TIMEOUT_CYCLES), None);

        // trace-ul se termina inainte de limita: nu decidem
        let short = vec![cycle(false, false), cycle(true, false), cycle(true, false)];
        assert_eq!(first_timeout(&short, TIMEOUT_CYCLES), None);
    }

    #[test]
    fn scheduled_run_never_times_out() {
        let jobs = reference_jobs();
        let trace = simulate(Schedule::new(4).stimulus(&jobs)).unwrap();
        assert_eq!(first_timeout(&trace, TIMEOUT_CYCLES), None);
    }

    #[test]
    fn no_jobs_no_results() {
        assert!(run_jobs(&[], &Schedule::new(0)).unwrap().is_empty());
    }

    #[test]
    fn verify_reports_first_mismatch() {
        let jobs = reference_jobs();
        let err = verify(&jobs, &[20, 36, 66]).unwrap_err();
        assert!(matches!(
            err,
            HostError::Mismatch { index: 1, expected: 35, actual: 36 }
        ));

        let err = verify(&jobs, &[20]).unwrap_err();
        assert!(matches!(err, HostError::ResultCount { offered: 3, delivered: 1 }));
    }
}
