use rhdl::prelude::*;

// latimea operanzilor (W) pentru data si weight
pub type Operand = s8;

// latimea acc-ului de intrare (suma partiala de la PE-ul din amonte)
pub type Accum = s32;

// produsul si rezultatul: cel putin un bit peste max(latime acc, 2W),
// deci acc + data * weight nu face niciodata wrap
pub type Sum = s64;

// fronturi de ceas intre acceptarea job-ului si primul front cu output_valid
// cate unul pentru fiecare stare de calcul (Multiply, Accumulate)
pub const MAC_LATENCY: usize = 2;

// tripletul de operanzi, capturat atomic
#[derive(PartialEq, Debug, Digital, Default)]
pub struct Operands {
    pub data: Operand,
    pub weight: Operand,
    pub acc: Accum,
}

// i/o interface

#[derive(PartialEq, Debug, Digital, Default)]
pub struct PeInput {
    // sincron, activ pe 1, are prioritate absoluta
    pub reset: bool,
    // strobe-ul producatorului
    pub input_valid: bool,
    pub operands: Operands,
    // consumatorul accepta rezultatul
    pub consumer_ready: bool,
}

#[derive(PartialEq, Debug, Digital, Default)]
pub struct PeOutput {
    // un job ocupa unitatea
    pub input_busy: bool,
    // rezultatul e gata si stabil
    pub output_valid: bool,
    pub result: Sum,
}

impl Operands {
    pub fn new(data: i8, weight: i8, acc: i32) -> Self {
        Self {
            data: Operand::from(data as i128),
            weight: Operand::from(weight as i128),
            acc: Accum::from(acc as i128),
        }
    }

    // modelul de referinta (host)
    pub fn expected(&self) -> Result<i64, RHDLError> {
        let data = self.data.typed_bits().as_i64()?;
        let weight = self.weight.typed_bits().as_i64()?;
        let acc = self.acc.typed_bits().as_i64()?;
        Ok(acc + data * weight)
    }
}

impl PeInput {
    // nimic pe fire
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn reset() -> Self {
        Self {
            reset: true,
            ..Self::default()
        }
    }

    // punem tripletul pe fire cu strobe
    pub fn offer(operands: Operands) -> Self {
        Self {
            input_valid: true,
            operands,
            ..Self::default()
        }
    }

    // datele raman pe fire, strobe-ul cade
    pub fn hold(operands: Operands) -> Self {
        Self {
            operands,
            ..Self::default()
        }
    }

    pub fn with_ready(self, consumer_ready: bool) -> Self {
        Self {
            consumer_ready,
            ..self
        }
    }
}

impl PeOutput {
    pub fn result_value(&self) -> Result<i64, RHDLError> {
        self.result.typed_bits().as_i64()
    }
}
