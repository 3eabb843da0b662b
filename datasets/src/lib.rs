use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use ndarray::{Array2, Axis};
use ndarray_csv::{Array2Reader, ReadError};

use salreg::{Dataset, Error, Result};

fn array_from_reader<R: Read>(reader: R) -> Result<Array2<f64>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_reader(reader);
    reader.deserialize_array2_dynamic().map_err(|e| match e {
        ReadError::Csv(e) => Error::Csv(e),
        e => Error::InvalidInput(format!("malformed csv: {}", e)),
    })
}

/// The first column holds the feature, the last one the target.
fn dataset_from_array(array: Array2<f64>) -> Result<Dataset> {
    let n_cols = array.len_of(Axis(1));
    if n_cols < 2 {
        return Err(Error::InvalidInput(format!(
            "expected a feature and a target column, got {} column(s)",
            n_cols
        )));
    }
    let x = array.column(0).to_owned();
    let y = array.column(n_cols - 1).to_owned();
    Dataset::new(x, y)
}

#[cfg(feature = "salary")]
/// Years of experience against yearly salary, 30 samples.
pub fn salary() -> Result<Dataset> {
    let data = include_bytes!("../data/salary.csv.gz");
    let array = array_from_reader(GzDecoder::new(&data[..]))?;
    dataset_from_array(array)
}

/// Load a headed CSV file, decompressing it first when it ends in `.gz`.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let array = match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => array_from_reader(GzDecoder::new(file))?,
        _ => array_from_reader(file)?,
    };
    dataset_from_array(array)
}
