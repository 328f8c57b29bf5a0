use rhdl::prelude::*;

pub mod types;
pub mod alu;
pub mod control_unit;
pub mod engine;
pub mod sim;

// doar numele structurilor, NU si Q/D-ul lor intern
pub use types::{Operands, PeInput, PeOutput, Operand, Accum, Sum, MAC_LATENCY};
pub use control_unit::{ControlUnit, ControlSignals, Handshake};
pub use engine::Engine;
pub use sim::{simulate, acceptances, deliveries, held_result, Cycle, Delivery};

// procesing element-ul: automat + datapath
#[derive(Synchronous, SynchronousDQ, Clone, Debug)]
pub struct PeCore {
    cu: ControlUnit,
    engine: Engine,
}

impl Default for PeCore {
    fn default() -> Self {
        Self {
            cu: ControlUnit::default(),
            engine: Engine::default(),
        }
    }
}

impl SynchronousIO for PeCore {
    type I = PeInput;
    type O = PeOutput;
    type Kernel = top_kernel;
}

// kernelul este practic wiring
// Q-ul de aici este STRICT cel al PeCore
#[kernel]
pub fn top_kernel(_cr: ClockReset, input: PeInput, q: Q) -> (PeOutput, D) {
    let mut d = D::dont_care();

    // unitatea de control vede doar handshake-ul
    d.cu = Handshake {
        reset: input.reset,
        input_valid: input.input_valid,
        consumer_ready: input.consumer_ready,
    };

    // engine-ul primeste (operanzi, comenzi)
    d.engine = (input.operands, q.cu);

    let output = PeOutput {
        input_busy: q.cu.input_busy,
        output_valid: q.cu.output_valid,
        result: q.engine,
    };

    (output, d)
}
