use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use pe_core::Operands;

use crate::error::HostError;

// un rand din fisierul de job-uri: data,weight,acc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MacJob {
    pub data: i8,
    pub weight: i8,
    pub acc: i32,
}

impl MacJob {
    pub fn new(data: i8, weight: i8, acc: i32) -> Self {
        Self { data, weight, acc }
    }

    pub fn operands(&self) -> Operands {
        Operands::new(self.data, self.weight, self.acc)
    }

    // acc + data * weight, fara trunchiere
    pub fn expected(&self) -> i64 {
        self.acc as i64 + self.data as i64 * self.weight as i64
    }
}

// job-urile din mediul de verificare
pub fn reference_jobs() -> Vec<MacJob> {
    vec![
        MacJob::new(5, 4, 0),
        MacJob::new(10, 3, 5),
        MacJob::new(7, 8, 10),
    ]
}

pub fn load_jobs(path: &Path) -> Result<Vec<MacJob>, HostError> {
    let file = File::open(path).map_err(|source| HostError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let mut jobs = Vec::new();

    for result in rdr.deserialize() {
        jobs.push(result?);
    }
    Ok(jobs)
}
