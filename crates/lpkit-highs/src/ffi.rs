//! Raw access to the HiGHS C API.
//!
//! This module contains unsafe code for interacting with the C library.
#![allow(unsafe_code)]

use std::ffi::{CStr, CString, c_void};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Longest name HiGHS hands back, including the terminator.
pub(crate) const NAME_BUFFER_LEN: usize = 512;

/// The `HighsInt` status of a failed raw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStatus(pub highs_sys::HighsInt);

pub(crate) fn check(status: highs_sys::HighsInt) -> Result<(), RawStatus> {
    if status == highs_sys::STATUS_OK || status == highs_sys::STATUS_WARNING {
        Ok(())
    } else {
        Err(RawStatus(status))
    }
}

/// LP data pulled back out of an engine instance, 0-based.
#[derive(Debug, Clone, Default)]
pub(crate) struct EngineLp {
    pub(crate) maximize: bool,
    pub(crate) offset: f64,
    pub(crate) costs: Vec<f64>,
    pub(crate) col_lower: Vec<f64>,
    pub(crate) col_upper: Vec<f64>,
    pub(crate) row_lower: Vec<f64>,
    pub(crate) row_upper: Vec<f64>,
    pub(crate) col_starts: Vec<usize>,
    pub(crate) row_indices: Vec<usize>,
    pub(crate) values: Vec<f64>,
    pub(crate) col_names: Vec<String>,
    pub(crate) row_names: Vec<String>,
}

/// Owned HiGHS instance created with `Highs_create`.
///
/// Released by [`EngineHandle::free`] or on drop; both are idempotent.
#[derive(Debug)]
pub(crate) struct EngineHandle {
    ptr: *mut c_void,
}

impl EngineHandle {
    pub(crate) fn new() -> Self {
        let ptr = unsafe { highs_sys::Highs_create() };
        trace!(
            component = "engine",
            operation = "create",
            status = "success",
            "Created HiGHS instance"
        );
        Self { ptr }
    }

    pub(crate) fn is_live(&self) -> bool {
        !self.ptr.is_null()
    }

    pub(crate) fn free(&mut self) {
        if !self.ptr.is_null() {
            unsafe { highs_sys::Highs_destroy(self.ptr) };
            self.ptr = std::ptr::null_mut();
            trace!(
                component = "engine",
                operation = "destroy",
                status = "success",
                "Destroyed HiGHS instance"
            );
        }
    }

    pub(crate) fn set_quiet(&mut self) {
        for option in ["output_flag", "log_to_console"] {
            let Ok(name) = CString::new(option) else {
                continue;
            };
            let status = unsafe { highs_sys::Highs_setBoolOptionValue(self.ptr, name.as_ptr(), 0) };
            if check(status).is_err() {
                warn!(
                    component = "engine",
                    operation = "set_option",
                    status = "warn",
                    option,
                    status_code = status,
                    "Failed to silence HiGHS"
                );
            }
        }
    }

    /// Read an LP or MPS file into the instance.
    pub(crate) fn read_model(&mut self, path: &Path) -> Result<(), RawStatus> {
        let Some(text) = path.to_str() else {
            return Err(RawStatus(highs_sys::STATUS_ERROR));
        };
        let c_path = CString::new(text).map_err(|_| RawStatus(highs_sys::STATUS_ERROR))?;
        check(unsafe { highs_sys::Highs_readModel(self.ptr, c_path.as_ptr()) })
    }

    /// Copy the loaded LP out of the instance.
    pub(crate) fn extract_lp(&self) -> Result<EngineLp, RawStatus> {
        let num_cols = unsafe { highs_sys::Highs_getNumCols(self.ptr) };
        let num_rows = unsafe { highs_sys::Highs_getNumRows(self.ptr) };
        let num_nz = unsafe { highs_sys::Highs_getNumNz(self.ptr) };
        let cols = usize::try_from(num_cols).map_err(|_| RawStatus(highs_sys::STATUS_ERROR))?;
        let rows = usize::try_from(num_rows).map_err(|_| RawStatus(highs_sys::STATUS_ERROR))?;
        let nnz = usize::try_from(num_nz).map_err(|_| RawStatus(highs_sys::STATUS_ERROR))?;

        let mut lp = EngineLp {
            costs: vec![0.0; cols],
            col_lower: vec![0.0; cols],
            col_upper: vec![0.0; cols],
            row_lower: vec![0.0; rows],
            row_upper: vec![0.0; rows],
            ..EngineLp::default()
        };

        let mut sense: highs_sys::HighsInt = 0;
        check(unsafe { highs_sys::Highs_getObjectiveSense(self.ptr, &raw mut sense) })?;
        lp.maximize = sense == highs_sys::OBJECTIVE_SENSE_MAXIMIZE;
        check(unsafe { highs_sys::Highs_getObjectiveOffset(self.ptr, &raw mut lp.offset) })?;

        if cols > 0 {
            let mut starts: Vec<highs_sys::HighsInt> = vec![0; cols];
            let mut indices: Vec<highs_sys::HighsInt> = vec![0; nnz.max(1)];
            let mut values = vec![0.0; nnz.max(1)];
            let mut got_cols: highs_sys::HighsInt = 0;
            let mut got_nz: highs_sys::HighsInt = 0;
            check(unsafe {
                highs_sys::Highs_getColsByRange(
                    self.ptr,
                    0,
                    num_cols - 1,
                    &raw mut got_cols,
                    lp.costs.as_mut_ptr(),
                    lp.col_lower.as_mut_ptr(),
                    lp.col_upper.as_mut_ptr(),
                    &raw mut got_nz,
                    starts.as_mut_ptr(),
                    indices.as_mut_ptr(),
                    values.as_mut_ptr(),
                )
            })?;
            let got_nz = usize::try_from(got_nz).unwrap_or(0).min(nnz);
            lp.col_starts = starts
                .iter()
                .map(|&start| usize::try_from(start).unwrap_or(0))
                .collect();
            lp.col_starts.push(got_nz);
            lp.row_indices = indices[..got_nz]
                .iter()
                .map(|&index| usize::try_from(index).unwrap_or(0))
                .collect();
            values.truncate(got_nz);
            lp.values = values;
        } else {
            lp.col_starts = vec![0];
        }

        if rows > 0 {
            let mut got_rows: highs_sys::HighsInt = 0;
            let mut got_nz: highs_sys::HighsInt = 0;
            check(unsafe {
                highs_sys::Highs_getRowsByRange(
                    self.ptr,
                    0,
                    num_rows - 1,
                    &raw mut got_rows,
                    lp.row_lower.as_mut_ptr(),
                    lp.row_upper.as_mut_ptr(),
                    &raw mut got_nz,
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                )
            })?;
        }

        lp.col_names = (0..num_cols).map(|col| self.col_name(col)).collect();
        lp.row_names = (0..num_rows).map(|row| self.row_name(row)).collect();

        debug!(
            component = "engine",
            operation = "extract_lp",
            status = "success",
            num_cols = cols,
            num_rows = rows,
            nnz,
            maximize = lp.maximize,
            "Extracted LP from HiGHS"
        );
        Ok(lp)
    }

    fn col_name(&self, col: highs_sys::HighsInt) -> String {
        let mut buffer = vec![0u8; NAME_BUFFER_LEN];
        let status =
            unsafe { highs_sys::Highs_getColName(self.ptr, col, buffer.as_mut_ptr().cast()) };
        name_from_buffer(status, &buffer)
    }

    fn row_name(&self, row: highs_sys::HighsInt) -> String {
        let mut buffer = vec![0u8; NAME_BUFFER_LEN];
        let status =
            unsafe { highs_sys::Highs_getRowName(self.ptr, row, buffer.as_mut_ptr().cast()) };
        name_from_buffer(status, &buffer)
    }
}

fn name_from_buffer(status: highs_sys::HighsInt, buffer: &[u8]) -> String {
    if check(status).is_err() {
        return String::new();
    }
    CStr::from_bytes_until_nul(buffer)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.free();
    }
}

/// Read an integer info value from a solved instance.
pub(crate) fn int_info(solved: &highs::SolvedModel, name: &'static str) -> Option<i64> {
    let c_name = CString::new(name).ok()?;
    let mut value: highs_sys::HighsInt = 0;
    let status = unsafe {
        highs_sys::Highs_getIntInfoValue(solved.as_ptr(), c_name.as_ptr(), &raw mut value)
    };
    if check(status).is_err() {
        debug!(
            component = "solver",
            operation = "solve_info",
            info = name,
            status_code = status,
            "Info value not available"
        );
        return None;
    }
    Some(i64::from(value))
}

/// Return the HiGHS solver version string, if available.
pub fn highs_version() -> Option<String> {
    unsafe {
        let ptr = highs_sys::Highs_version();
        if ptr.is_null() {
            None
        } else {
            CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_handle_free_is_idempotent() {
        let mut handle = EngineHandle::new();
        assert!(handle.is_live());
        handle.free();
        handle.free();
        assert!(!handle.is_live());
    }

    #[test]
    fn test_empty_instance_extracts_empty_lp() {
        let mut handle = EngineHandle::new();
        handle.set_quiet();
        let lp = handle.extract_lp().unwrap();
        assert!(lp.costs.is_empty());
        assert!(lp.row_lower.is_empty());
        assert_eq!(lp.col_starts, vec![0]);
    }

    #[test]
    fn test_name_from_buffer() {
        let mut buffer = vec![0u8; 8];
        buffer[..3].copy_from_slice(b"abc");
        assert_eq!(name_from_buffer(highs_sys::STATUS_OK, &buffer), "abc");
        assert_eq!(name_from_buffer(highs_sys::STATUS_ERROR, &buffer), "");
    }

    #[test]
    fn test_highs_version_reported() {
        let version = highs_version().unwrap_or_default();
        assert!(!version.is_empty());
    }
}
