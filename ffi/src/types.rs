//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use food_core::{ApiError, FavoriteSync, HttpMethod, HttpRequest, HttpResponse};

/// Opaque handle to an `OrderComposer`. C callers receive a pointer to this
/// and pass it back into every `food_composer_*` function.
pub struct FfiOrderComposer {
    pub(crate) inner: food_core::OrderComposer,
}

/// Copy `s` into a heap C string owned by the caller. A string with an
/// interior NUL comes out empty.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Borrow a caller-owned C string; invalid UTF-8 reads as empty.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string that
/// outlives the returned reference.
pub(crate) unsafe fn borrow_str<'a>(ptr: *const c_char) -> &'a str {
    CStr::from_ptr(ptr).to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// The C caller executes the request and hands the outcome back through the
/// matching `food_composer_apply_*` / `food_composer_finish_*` function.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// The outcome of an HTTP request, filled in by the C caller.
///
/// When the request never got an answer, set `transport_error` to a
/// description; `status` and `body` are then ignored. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
    pub transport_error: *const c_char,
}

impl FfiHttpResponse {
    pub(crate) fn to_core(&self) -> Result<HttpResponse, ApiError> {
        if !self.transport_error.is_null() {
            let reason = unsafe { borrow_str(self.transport_error) };
            return Err(ApiError::Transport(reason.to_string()));
        }
        let body = if self.body.is_null() {
            String::new()
        } else {
            unsafe { borrow_str(self.body) }.to_string()
        };
        Ok(HttpResponse::new(self.status, body))
    }
}

/// Which remote call a favorite toggle issued.
#[repr(C)]
#[derive(Clone, Copy)]
pub enum FfiFavoriteSync {
    Create = 0,
    Delete = 1,
}

impl FfiFavoriteSync {
    /// Read a discriminant handed back by C. Unknown values yield `None`.
    pub(crate) fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(FfiFavoriteSync::Create),
            1 => Some(FfiFavoriteSync::Delete),
            _ => None,
        }
    }
}

impl From<FavoriteSync> for FfiFavoriteSync {
    fn from(sync: FavoriteSync) -> Self {
        match sync {
            FavoriteSync::Create => FfiFavoriteSync::Create,
            FavoriteSync::Delete => FfiFavoriteSync::Delete,
        }
    }
}

impl From<FfiFavoriteSync> for FavoriteSync {
    fn from(sync: FfiFavoriteSync) -> Self {
        match sync {
            FfiFavoriteSync::Create => FavoriteSync::Create,
            FfiFavoriteSync::Delete => FavoriteSync::Delete,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Transport = 5,
    Panic = 6,
    NullArg = 7,
}

/// Result envelope for operations that consume a response.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `payload`
/// holds the operation's text result (the order id for
/// `food_composer_finish_order`) or null. On failure `error_code` describes
/// the category and `error_message` is a human-readable C string.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub payload: *mut c_char,
}

impl FfiResult {
    fn boxed(error_code: FfiErrorCode, error_message: *mut c_char, http_status: u16, payload: *mut c_char) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message,
            http_status,
            payload,
        }))
    }

    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), 0, std::ptr::null_mut())
    }

    pub(crate) fn ok_payload(payload: String) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), 0, c_string(payload))
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::NotFound => (FfiErrorCode::NotFound, 404u16),
            ApiError::HttpError { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::DeserializationError(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::SerializationError(_) => (FfiErrorCode::Serialization, 0),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
        };
        Self::boxed(error_code, c_string(err.to_string()), http_status, std::ptr::null_mut())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            0,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, c_string(msg), 0, std::ptr::null_mut())
    }
}
