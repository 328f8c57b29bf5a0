use log::debug;
use nalgebra::DMatrix;

use crate::data_loader::MacJob;
use crate::driver::{run_jobs, Schedule};
use crate::error::HostError;

// C = A * B printr-un singur PE: cate o trecere pentru fiecare k,
// rezultatul trecerii k devine acc-ul trecerii k + 1
pub fn matmul_on_pe(
    a: &DMatrix<i8>,
    b: &DMatrix<i8>,
    schedule: &Schedule,
) -> Result<DMatrix<i32>, HostError> {
    if a.ncols() != b.nrows() {
        return Err(HostError::Shape {
            left: a.shape(),
            right: b.shape(),
        });
    }

    let (rows, cols) = (a.nrows(), b.ncols());
    let mut acc = DMatrix::<i32>::zeros(rows, cols);

    for k in 0..a.ncols() {
        let mut jobs = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                jobs.push(MacJob::new(a[(i, k)], b[(k, j)], acc[(i, j)]));
            }
        }

        let results = run_jobs(&jobs, schedule)?;
        debug!("pass k={}: {} partial sums", k, results.len());

        // aceeasi ordine ca la emitere (FIFO)
        for (n, value) in results.into_iter().enumerate() {
            let (row, col) = (n / cols, n % cols);
            acc[(row, col)] = partial_sum(row, col, value)?;
        }
    }

    Ok(acc)
}

// suma partiala redevine acc pentru trecerea urmatoare, trebuie sa incapa
fn partial_sum(row: usize, col: usize, value: i64) -> Result<i32, HostError> {
    i32::try_from(value).map_err(|_| HostError::PartialSumRange { row, col, value })
}

// produsul de referinta
pub fn reference_product(a: &DMatrix<i8>, b: &DMatrix<i8>) -> DMatrix<i32> {
    a.map(i32::from) * b.map(i32::from)
}

// primul element diferit, parcurs pe randuri
pub fn first_mismatch(actual: &DMatrix<i32>, expected: &DMatrix<i32>) -> Option<HostError> {
    if actual.shape() != expected.shape() {
        return Some(HostError::Shape {
            left: actual.shape(),
            right: expected.shape(),
        });
    }

    for row in 0..expected.nrows() {
        for col in 0..expected.ncols() {
            if actual[(row, col)] != expected[(row, col)] {
                return Some(HostError::MatrixMismatch {
                    row,
                    col,
                    expected: expected[(row, col)],
                    actual: actual[(row, col)],
                });
            }
        }
    }
    None
}

// matrice de test deterministe, cu valori negative
pub fn demo_matrices(n: usize) -> (DMatrix<i8>, DMatrix<i8>) {
    let a = DMatrix::from_fn(n, n, |i, j| ((i * 3 + j * 5) % 11) as i8 - 5);
    let b = DMatrix::from_fn(n, n, |i, j| ((i * 7 + j * 2 + 1) % 13) as i8 - 6);
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn two_by_two_product() {
        let a = DMatrix::from_row_slice(2, 2, &[1i8, 2, 3, 4]);
        let b = DMatrix::from_row_slice(2, 2, &[5i8, 6, 7, 8]);
        let c = matmul_on_pe(&a, &b, &Schedule::new(0)).unwrap();
        assert_eq!(c, DMatrix::from_row_slice(2, 2, &[19, 22, 43, 50]));
    }

    #[test]
    fn rectangular_matches_reference() {
        let a = DMatrix::from_fn(2, 3, |i, j| (i as i8 + 1) * (j as i8 - 1));
        let b = DMatrix::from_fn(3, 4, |i, j| i as i8 * 4 - j as i8);
        let c = matmul_on_pe(&a, &b, &Schedule::default()).unwrap();
        assert_eq!(c, reference_product(&a, &b));
    }

    #[test]
    fn demo_matrices_match_reference() {
        let (a, b) = demo_matrices(3);
        let c = matmul_on_pe(&a, &b, &Schedule::new(2)).unwrap();
        assert_eq!(c, reference_product(&a, &b));
    }

    #[test]
    fn mismatch_is_located() {
        let expected = DMatrix::from_row_slice(2, 2, &[1, 2, 3, 4]);
        let actual = DMatrix::from_row_slice(2, 2, &[1, 2, 5, 4]);
        assert!(first_mismatch(&expected, &expected).is_none());
        assert!(matches!(
            first_mismatch(&actual, &expected),
            Some(HostError::MatrixMismatch { row: 1, col: 0, expected: 3, actual: 5 })
        ));
    }

    #[test]
    fn partial_sum_must_fit_accumulator() {
        assert_eq!(partial_sum(0, 0, -5).unwrap(), -5);
        assert!(matches!(
            partial_sum(1, 2, i32::MAX as i64 + 1),
            Err(HostError::PartialSumRange { row: 1, col: 2, .. })
        ));
    }

    #[test]
    fn shapes_must_chain() {
        let a = DMatrix::<i8>::zeros(2, 3);
        let b = DMatrix::<i8>::zeros(2, 3);
        assert!(matches!(
            matmul_on_pe(&a, &b, &Schedule::default()),
            Err(HostError::Shape { .. })
        ));
    }
}
