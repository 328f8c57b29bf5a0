use rhdl::prelude::*;
use rhdl_fpga::core::dff::DFF;

// semnalele de handshake care intra in automat
#[derive(PartialEq, Debug, Digital, Default)]
pub struct Handshake {
    pub reset: bool,
    pub input_valid: bool,
    pub consumer_ready: bool,
}

// semnalele de control care pleaca
#[derive(PartialEq, Debug, Digital, Default)]
pub struct ControlSignals {
    pub capture: bool,      // scrie tripletul de intrare in registre
    pub multiply: bool,     // salveaza produsul data * weight
    pub accumulate: bool,   // salveaza acc + produs in registrul de rezultat
    pub release: bool,      // consumatorul a luat rezultatul, golim datapath-ul
    pub clear: bool,        // reset sincron
    pub input_busy: bool,   // nu mai acceptam alt triplet
    pub output_valid: bool, // rezultatul final e gata
}

// starile automatului finit
#[derive(PartialEq, Debug, Digital, Default)]
pub enum State {
    #[default]
    Idle,       // asteapta input_valid
    Multiply,   // job capturat, calculeaza produsul
    Accumulate, // aduna acc la produs
    Hold,       // tine rezultatul pana il accepta consumatorul
}

// componenta hardware cu registru de stare
#[derive(Synchronous, SynchronousDQ, Clone, Debug)]
pub struct ControlUnit {
    state: DFF<State>,
}

impl Default for ControlUnit {
    fn default() -> Self {
        Self {
            state: DFF::new(State::Idle),
        }
    }
}

// interfata io
impl SynchronousIO for ControlUnit {
    type I = Handshake;
    type O = ControlSignals;
    type Kernel = cu_kernel;
}

// logica de tranzitie
// busy si valid depind doar de starea din registru
#[kernel]
pub fn cu_kernel(_cr: ClockReset, hs: Handshake, q: Q) -> (ControlSignals, D) {
    let mut cs = ControlSignals::default();
    let mut next_state = q.state;

    match q.state {
        State::Idle => {
            if hs.input_valid {
                cs.capture = true;
                next_state = State::Multiply;
            }
        },
        State::Multiply => {
            cs.input_busy = true;
            cs.multiply = true;
            next_state = State::Accumulate;
        },
        State::Accumulate => {
            cs.input_busy = true;
            cs.accumulate = true;
            next_state = State::Hold;
        },
        State::Hold => {
            cs.input_busy = true;
            cs.output_valid = true;
            if hs.consumer_ready {
                cs.release = true;
                next_state = State::Idle;
            }
        }
    }

    // resetul bate orice tranzitie, iesirile raman cele din registru
    if hs.reset {
        cs.capture = false;
        cs.multiply = false;
        cs.accumulate = false;
        cs.release = false;
        cs.clear = true;
        next_state = State::Idle;
    }

    (cs, D { state: next_state })
}
