//! Python bindings for htsget-client using PyO3
//!
//! Exposes the top-level retrieval as `htsget_client.get(url, output, ...)`.

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
use std::path::PathBuf;

#[cfg(feature = "python")]
use crate::{Client, Error, RetrievalParameters};

/// Python module for htsget-client
#[cfg(feature = "python")]
#[pymodule]
fn htsget_client(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(get, m)?)?;
    Ok(())
}

/// Retrieve `url` into the file at `output`. The file is removed on failure.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (
    url, output, format=None, reference_name=None, reference_md5=None,
    start=None, end=None, fields=None, tags=None, notags=None, timeout=5
))]
#[allow(clippy::too_many_arguments)]
fn get(
    py: Python<'_>,
    url: String,
    output: PathBuf,
    format: Option<String>,
    reference_name: Option<String>,
    reference_md5: Option<String>,
    start: Option<u64>,
    end: Option<u64>,
    fields: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    notags: Option<Vec<String>>,
    timeout: u64,
) -> PyResult<()> {
    let mut builder = RetrievalParameters::builder();
    if let Some(format) = format {
        builder = builder.format(format.parse().map_err(to_py_err)?);
    }
    if let Some(name) = reference_name {
        builder = builder.reference_name(name);
    }
    if let Some(md5) = reference_md5 {
        builder = builder.reference_md5(md5);
    }
    if let Some(start) = start {
        builder = builder.start(start);
    }
    if let Some(end) = end {
        builder = builder.end(end);
    }
    if let Some(fields) = fields {
        builder = builder.fields(fields);
    }
    if let Some(tags) = tags {
        builder = builder.tags(tags);
    }
    if let Some(notags) = notags {
        builder = builder.notags(notags);
    }
    let params = builder.build().map_err(to_py_err)?;

    py.allow_threads(|| {
        let client = Client::new(std::time::Duration::from_secs(timeout));
        let mut file = std::fs::File::create(&output)?;
        let result = client.retrieve(&url, &mut file, &params);
        if result.is_err() {
            drop(file);
            let _ = std::fs::remove_file(&output);
        }
        result
    })
    .map_err(to_py_err)
}

#[cfg(feature = "python")]
fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::InvalidParameters(_) => pyo3::exceptions::PyValueError::new_err(err.to_string()),
        Error::Io(_) => pyo3::exceptions::PyIOError::new_err(err.to_string()),
        _ => pyo3::exceptions::PyRuntimeError::new_err(err.to_string()),
    }
}
