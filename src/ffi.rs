//! FFI bindings for MeritMap
//!
//! This module provides C-compatible functions for calling MeritMap from other
//! languages. All functions use C strings (null-terminated) and return
//! allocated memory that must be freed by the caller using
//! `meritmap_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::artifacts::ModelArtifacts;
use crate::pipeline::{evaluate_profile_json, ReadinessPipeline};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Load artifacts, evaluate one profile and return report JSON.
///
/// # Safety
/// - `model_json`, `scaler_json` and `profile_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `meritmap_free_string`.
/// - Returns NULL on error; call `meritmap_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn meritmap_evaluate_once(
    model_json: *const c_char,
    scaler_json: *const c_char,
    profile_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(model) = cstr_to_string(model_json) else {
        set_last_error("Invalid model JSON string pointer");
        return ptr::null_mut();
    };
    let Some(scaler) = cstr_to_string(scaler_json) else {
        set_last_error("Invalid scaler JSON string pointer");
        return ptr::null_mut();
    };
    let Some(profile) = cstr_to_string(profile_json) else {
        set_last_error("Invalid profile JSON string pointer");
        return ptr::null_mut();
    };

    match evaluate_profile_json(&model, &scaler, &profile) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Evaluator Handle API
// ============================================================================

/// Opaque handle to a loaded evaluator
pub struct MeritMapEvaluatorHandle {
    pipeline: ReadinessPipeline,
}

/// Load artifacts once and return an evaluator handle.
///
/// # Safety
/// - `model_json` and `scaler_json` must be valid null-terminated C strings.
/// - Must be freed with `meritmap_evaluator_free`.
/// - Returns NULL on error; call `meritmap_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn meritmap_evaluator_new(
    model_json: *const c_char,
    scaler_json: *const c_char,
) -> *mut MeritMapEvaluatorHandle {
    clear_last_error();

    let Some(model) = cstr_to_string(model_json) else {
        set_last_error("Invalid model JSON string pointer");
        return ptr::null_mut();
    };
    let Some(scaler) = cstr_to_string(scaler_json) else {
        set_last_error("Invalid scaler JSON string pointer");
        return ptr::null_mut();
    };

    match ModelArtifacts::from_json(&model, &scaler) {
        Ok(artifacts) => Box::into_raw(Box::new(MeritMapEvaluatorHandle {
            pipeline: ReadinessPipeline::new(artifacts),
        })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free an evaluator handle.
///
/// # Safety
/// - `evaluator` must be a valid pointer returned by `meritmap_evaluator_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn meritmap_evaluator_free(evaluator: *mut MeritMapEvaluatorHandle) {
    if !evaluator.is_null() {
        drop(Box::from_raw(evaluator));
    }
}

/// Evaluate a JSON profile with a loaded evaluator.
///
/// # Safety
/// - `evaluator` must be a valid pointer returned by `meritmap_evaluator_new`.
/// - `profile_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `meritmap_free_string`.
/// - Returns NULL on error; call `meritmap_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn meritmap_evaluate(
    evaluator: *const MeritMapEvaluatorHandle,
    profile_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if evaluator.is_null() {
        set_last_error("Null evaluator pointer");
        return ptr::null_mut();
    }

    let handle = &*evaluator;

    let Some(profile) = cstr_to_string(profile_json) else {
        set_last_error("Invalid profile JSON string pointer");
        return ptr::null_mut();
    };

    match handle.pipeline.process_json(&profile) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by MeritMap functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a MeritMap function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn meritmap_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next MeritMap function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn meritmap_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the MeritMap library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn meritmap_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
