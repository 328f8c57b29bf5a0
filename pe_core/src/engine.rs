use rhdl::prelude::*;
use rhdl_fpga::core::dff::DFF;
use crate::types::*;
use crate::alu::*;
use crate::control_unit::ControlSignals;

// registrele aritmetice dupa tripletul capturat
#[derive(PartialEq, Debug, Digital, Default)]
pub struct MacStage {
    pub product: Sum,
    pub result: Sum,
}

// structura engine (datapath), fara unitatea de control inauntru
// contine doar registrele de date
#[derive(Synchronous, SynchronousDQ, Clone, Debug)]
pub struct Engine {
    // tripletul acceptat, autoritar pana la finalul job-ului
    pub operands: DFF<Operands>,
    pub stage: DFF<MacStage>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            operands: DFF::new(Operands::default()),
            stage: DFF::new(MacStage::default()),
        }
    }
}

// interfata io
impl SynchronousIO for Engine {
    type I = (Operands, ControlSignals);
    type O = Sum;
    type Kernel = engine_kernel;
}

#[kernel]
pub fn engine_kernel(
    _cr: ClockReset,
    input: (Operands, ControlSignals),
    q: Q
) -> (Sum, D) {
    let (ops_in, cs) = input;

    // 1. logica combinationala pe operanzii capturati
    let product = mac_product(q.operands.data, q.operands.weight);
    let sum = mac_accumulate(q.operands.acc, q.stage.product);

    // 2. starea viitoare, implicit hold
    let mut next_operands = q.operands;
    let mut next_stage = q.stage;

    if cs.capture {
        next_operands = ops_in;
    }

    if cs.multiply {
        next_stage.product = product;
    }

    if cs.accumulate {
        next_stage.result = sum;
    }

    // job terminat sau reset: nu lasam nimic pentru job-ul urmator
    if cs.release || cs.clear {
        next_operands = Operands::default();
        next_stage = MacStage::default();
    }

    (q.stage.result, D {
        operands: next_operands,
        stage: next_stage,
    })
}
