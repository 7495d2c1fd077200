// src/ffi.rs
#![cfg(feature = "ffi")]

//! C FFI for hsipbf (minimal stable ABI for firmware / C callers).
//!
//! Exports one-shot tag computation for both presets:
//! - hsipbf_halfsiphash24(key, data, len) -> u32
//! - hsipbf_halfsiphash13(key, data, len) -> u32
//! - hsipbf_tag(kind, key, data, len)     -> u32 (kind = HashKind code: 1 = 2-4, 2 = 1-3)
//! - hsipbf_tag_checked(kind, key, data, len, out) -> int (0 = ok, -1 = bad argument)
//!
//! Rules:
//! - `key` points to 8 readable bytes; NULL returns 0.
//! - `data` may be NULL only when `len == 0`; otherwise NULL returns 0.
//! - Unknown `kind` returns 0.
//! - 0 is also a valid tag, so the u32-returning calls cannot report errors.
//!   Callers that pass untrusted pointers or kinds use `hsipbf_tag_checked`,
//!   which writes the tag to `out` and returns a status.
//!
//! Build:
//!   cargo build --release --features ffi

use std::os::raw::{c_int, c_uchar, c_uint};
use std::slice;

use crate::consts::HSIP_KEY_LEN;
use crate::hash::{halfsiphash13, halfsiphash24, tag, HashKind};

// ---------- Helpers ----------

unsafe fn key_from<'a>(ptr: *const c_uchar) -> Option<&'a [u8; HSIP_KEY_LEN]> {
    if ptr.is_null() {
        return None;
    }
    // [u8; 8] has alignment 1, any non-null pointer to 8 readable bytes is fine.
    Some(&*(ptr as *const [u8; HSIP_KEY_LEN]))
}

unsafe fn bytes_from<'a>(ptr: *const c_uchar, len: usize) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(slice::from_raw_parts(ptr, len))
}

// ---------- Exports ----------

/// # Safety
/// `key` must point to 8 readable bytes; `data` to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn hsipbf_halfsiphash24(
    key: *const c_uchar,
    data: *const c_uchar,
    len: usize,
) -> u32 {
    match (key_from(key), bytes_from(data, len)) {
        (Some(k), Some(d)) => halfsiphash24(k, d),
        _ => 0,
    }
}

/// # Safety
/// `key` must point to 8 readable bytes; `data` to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn hsipbf_halfsiphash13(
    key: *const c_uchar,
    data: *const c_uchar,
    len: usize,
) -> u32 {
    match (key_from(key), bytes_from(data, len)) {
        (Some(k), Some(d)) => halfsiphash13(k, d),
        _ => 0,
    }
}

/// # Safety
/// `key` must point to 8 readable bytes; `data` to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn hsipbf_tag(
    kind: c_uint,
    key: *const c_uchar,
    data: *const c_uchar,
    len: usize,
) -> u32 {
    let kind = match HashKind::from_u32(kind) {
        Some(k) => k,
        None => return 0,
    };
    match (key_from(key), bytes_from(data, len)) {
        (Some(k), Some(d)) => tag(kind, k, d),
        _ => 0,
    }
}

/// Like `hsipbf_tag`, with the status separate from the tag.
/// Returns 0 and stores the tag in `*out`, or -1 (NULL key/out, NULL data
/// with `len > 0`, unknown kind) leaving `*out` untouched.
///
/// # Safety
/// `key` must point to 8 readable bytes; `data` to `len` readable bytes;
/// `out` to a writable u32.
#[no_mangle]
pub unsafe extern "C" fn hsipbf_tag_checked(
    kind: c_uint,
    key: *const c_uchar,
    data: *const c_uchar,
    len: usize,
    out: *mut u32,
) -> c_int {
    if out.is_null() {
        return -1;
    }
    let kind = match HashKind::from_u32(kind) {
        Some(k) => k,
        None => return -1,
    };
    match (key_from(key), bytes_from(data, len)) {
        (Some(k), Some(d)) => {
            *out = tag(kind, k, d);
            0
        }
        _ => -1,
    }
}
