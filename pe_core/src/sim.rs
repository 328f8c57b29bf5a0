use rhdl::prelude::*;
use crate::types::{PeInput, PeOutput, Sum};
use crate::PeCore;

// un ciclu de ceas: ce era pe fire si ce vedea lumea la iesire
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cycle {
    pub input: PeInput,
    pub output: PeOutput,
}

// rezultat predat consumatorului
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delivery {
    // ciclul in care a urcat input_busy pentru job-ul asta
    pub accepted_at: Option<usize>,
    // primul ciclu cu output_valid
    pub first_valid: usize,
    pub result: i64,
}

impl Delivery {
    // cicluri de la acceptare pana la output_valid
    pub fn latency(&self) -> Option<usize> {
        self.accepted_at.map(|at| self.first_valid - at)
    }
}

// rulam un PE nou peste stimuli, cate o intrare pe ciclu de ceas
pub fn simulate<I>(inputs: I) -> Result<Vec<Cycle>, RHDLError>
where
    I: IntoIterator<Item = PeInput>,
{
    let uut = PeCore::default();
    let inputs: Vec<PeInput> = inputs.into_iter().collect();

    // .with_reset(1) -> reset activ in primul ciclu
    let stream = inputs.into_iter().with_reset(1).clock_pos_edge(100);

    // sample.value este (ClockReset, Input, Output)
    let trace = uut
        .run(stream)?
        .synchronous_sample()
        .map(|sample| Cycle {
            input: sample.value.1,
            output: sample.value.2,
        })
        .collect::<Vec<_>>();

    Ok(trace)
}

fn rising(trace: &[Cycle], level: impl Fn(&PeOutput) -> bool) -> Vec<usize> {
    (0..trace.len())
        .filter(|&i| level(&trace[i].output) && (i == 0 || !level(&trace[i - 1].output)))
        .collect()
}

// ciclurile in care unitatea a luat un job nou (front crescator pe input_busy)
// analiza se uita doar la fronturile iesirilor, deci nu conteaza cate cicluri
// de reset pune rhdl la inceput
pub fn acceptances(trace: &[Cycle]) -> Vec<usize> {
    rising(trace, |o| o.input_busy)
}

// fiecare fereastra output_valid inchisa in trace, in ordine
pub fn deliveries(trace: &[Cycle]) -> Result<Vec<Delivery>, RHDLError> {
    let accepted = acceptances(trace);
    let mut out = Vec::new();

    for first_valid in rising(trace, |o| o.output_valid) {
        // fereastra inca deschisa la final nu e livrare
        let closed = trace[first_valid..].iter().any(|c| !c.output.output_valid);
        if !closed {
            continue;
        }

        let accepted_at = accepted.iter().rev().copied().find(|&at| at <= first_valid);
        out.push(Delivery {
            accepted_at,
            first_valid,
            result: trace[first_valid].output.result_value()?,
        });
    }

    Ok(out)
}

// rezultatul tinut inca pe fire la finalul trace-ului
pub fn held_result(trace: &[Cycle]) -> Result<Option<i64>, RHDLError> {
    match trace.last() {
        Some(last) if last.output.output_valid => Ok(Some(last.output.result_value()?)),
        _ => Ok(None),
    }
}
