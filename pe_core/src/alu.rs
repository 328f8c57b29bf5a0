use rhdl::prelude::*;
use crate::types::*;

// inmultire: extindem la latimea rezultatului, produsul nu se trunchiaza
#[kernel]
pub fn mac_product(data: Operand, weight: Operand) -> Sum {
    let data_wide: Sum = data.resize();
    let weight_wide: Sum = weight.resize();

    data_wide * weight_wide
}

// acc + produs, exact: acc e extins la latimea rezultatului inainte de adunare
#[kernel]
pub fn mac_accumulate(acc: Accum, product: Sum) -> Sum {
    let acc_wide: Sum = acc.resize();
    acc_wide + product
}
