//! C-ABI wrapper around `food-core`'s `OrderComposer`.
//!
//! # Overview
//! Exposes the food detail screen's state machine through `extern "C"`
//! functions so a mobile shell with a C FFI can load a food, adjust
//! quantities, toggle the favorite and submit the order while doing the
//! HTTP itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Functions that need the service return an `FfiHttpRequest`; the caller
//!   executes it and passes an `FfiHttpResponse` to the matching
//!   `apply_*` / `finish_*` function.
//! - The C caller owns all returned pointers and must call the matching
//!   `food_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use food_core::{ClientConfig, CurrencyFormat};

use types::*;

/// `currency` code accepted by `food_composer_new`.
pub const FOOD_CURRENCY_BRL: u32 = 0;
pub const FOOD_CURRENCY_USD: u32 = 1;

// ---------------------------------------------------------------------------
// Composer lifecycle
// ---------------------------------------------------------------------------

/// Create a composer for `food_id` against the service at `base_url`.
///
/// `currency` is `FOOD_CURRENCY_BRL` or `FOOD_CURRENCY_USD`; other values
/// fall back to BRL. Returns null if `base_url` is null. The caller must
/// free the returned pointer with `food_composer_free`.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_new(
    base_url: *const c_char,
    food_id: u64,
    currency: u32,
) -> *mut FfiOrderComposer {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { borrow_str(base_url) };
        let currency = match currency {
            FOOD_CURRENCY_USD => CurrencyFormat::usd(),
            _ => CurrencyFormat::brl(),
        };
        let config = ClientConfig::new(url).with_currency(currency);
        let inner = food_core::OrderComposer::new(&config, food_id);
        Box::into_raw(Box::new(FfiOrderComposer { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a composer created by `food_composer_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_free(composer: *mut FfiOrderComposer) {
    if !composer.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(composer) });
        });
    }
}

/// Point the composer at another food. Returns true when the id changed;
/// the caller should then build and run both load requests again.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_navigate(composer: *mut FfiOrderComposer, food_id: u64) -> bool {
    catch_unwind(|| {
        if composer.is_null() {
            return false;
        }
        let composer = unsafe { &mut *composer };
        composer.inner.navigate_to(food_id)
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Build `GET favorites`. Returns null if `composer` is null.
/// The caller must free the returned pointer with `food_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_build_load_favorites(composer: *const FfiOrderComposer) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if composer.is_null() {
            return std::ptr::null_mut();
        }
        let composer = unsafe { &*composer };
        FfiHttpRequest::from_core(composer.inner.load_requests().favorites)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build `GET foods/{id}` for the current food. Returns null if `composer`
/// is null.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_build_load_food(composer: *const FfiOrderComposer) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if composer.is_null() {
            return std::ptr::null_mut();
        }
        let composer = unsafe { &*composer };
        FfiHttpRequest::from_core(composer.inner.load_requests().food)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Apply the outcome of `GET favorites`.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_apply_favorites(
    composer: *mut FfiOrderComposer,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        if composer.is_null() {
            return FfiResult::null_arg("composer");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let composer = unsafe { &mut *composer };
        let resp = unsafe { &*response };
        match composer.inner.apply_favorites(resp.to_core()) {
            Ok(()) => FfiResult::ok_empty(),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in food_composer_apply_favorites"))
}

/// Apply the outcome of `GET foods/{id}`.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_apply_food(
    composer: *mut FfiOrderComposer,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        if composer.is_null() {
            return FfiResult::null_arg("composer");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let composer = unsafe { &mut *composer };
        let resp = unsafe { &*response };
        match composer.inner.apply_food(resp.to_core()) {
            Ok(()) => FfiResult::ok_empty(),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in food_composer_apply_food"))
}

/// The loaded view as JSON: food, formatted unit price, favorite flag,
/// food quantity, extras with quantities and formatted total. Returns null
/// until both loads have been applied. Free with `food_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_details_json(composer: *const FfiOrderComposer) -> *mut c_char {
    catch_unwind(|| {
        if composer.is_null() {
            return std::ptr::null_mut();
        }
        let composer = unsafe { &*composer };
        let Some(details) = composer.inner.details() else {
            return std::ptr::null_mut();
        };
        let ledger = composer.inner.ledger();
        let view = serde_json::json!({
            "food": details.food,
            "formatted_price": details.formatted_price,
            "is_favorite": details.is_favorite,
            "food_quantity": ledger.food_quantity(),
            "extras": ledger.snapshot(),
            "total": composer.inner.formatted_total(),
        });
        c_string(view.to_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Quantities and pricing
// ---------------------------------------------------------------------------

/// Add one of `extra_id`. Returns the new quantity, or -1 if `composer` is
/// null or the food has no such extra.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_increment_extra(composer: *mut FfiOrderComposer, extra_id: u64) -> i64 {
    catch_unwind(|| {
        if composer.is_null() {
            return -1;
        }
        let composer = unsafe { &mut *composer };
        composer.inner.increment_extra(extra_id);
        extra_quantity(composer, extra_id)
    })
    .unwrap_or(-1)
}

/// Remove one of `extra_id`, stopping at zero. Same return as
/// `food_composer_increment_extra`.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_decrement_extra(composer: *mut FfiOrderComposer, extra_id: u64) -> i64 {
    catch_unwind(|| {
        if composer.is_null() {
            return -1;
        }
        let composer = unsafe { &mut *composer };
        composer.inner.decrement_extra(extra_id);
        extra_quantity(composer, extra_id)
    })
    .unwrap_or(-1)
}

/// Current quantity of `extra_id`, or -1 if unknown.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_extra_quantity(composer: *const FfiOrderComposer, extra_id: u64) -> i64 {
    catch_unwind(|| {
        if composer.is_null() {
            return -1;
        }
        extra_quantity(unsafe { &*composer }, extra_id)
    })
    .unwrap_or(-1)
}

fn extra_quantity(composer: &FfiOrderComposer, extra_id: u64) -> i64 {
    composer
        .inner
        .ledger()
        .extra_quantity(extra_id)
        .map_or(-1, i64::from)
}

/// Add one portion of the food. Returns the new quantity, 0 if `composer`
/// is null.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_increment_food(composer: *mut FfiOrderComposer) -> u32 {
    catch_unwind(|| {
        if composer.is_null() {
            return 0;
        }
        let composer = unsafe { &mut *composer };
        composer.inner.increment_food();
        composer.inner.ledger().food_quantity()
    })
    .unwrap_or(0)
}

/// Remove one portion of the food, stopping at one.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_decrement_food(composer: *mut FfiOrderComposer) -> u32 {
    catch_unwind(|| {
        if composer.is_null() {
            return 0;
        }
        let composer = unsafe { &mut *composer };
        composer.inner.decrement_food();
        composer.inner.ledger().food_quantity()
    })
    .unwrap_or(0)
}

#[unsafe(no_mangle)]
pub extern "C" fn food_composer_food_quantity(composer: *const FfiOrderComposer) -> u32 {
    catch_unwind(|| {
        if composer.is_null() {
            return 0;
        }
        unsafe { &*composer }.inner.ledger().food_quantity()
    })
    .unwrap_or(0)
}

/// Formatted cart total. Free with `food_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_cart_total(composer: *const FfiOrderComposer) -> *mut c_char {
    catch_unwind(|| {
        if composer.is_null() {
            return std::ptr::null_mut();
        }
        c_string(unsafe { &*composer }.inner.formatted_total())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Favorite
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn food_composer_is_favorite(composer: *const FfiOrderComposer) -> bool {
    catch_unwind(|| !composer.is_null() && unsafe { &*composer }.inner.is_favorite()).unwrap_or(false)
}

/// Flip the favorite flag and build the request that mirrors it remotely.
/// Writes which call it is to `out_sync`; pass it back to
/// `food_composer_finish_favorite`. Returns null if an argument is null or
/// the food or the favorites have not loaded, in which case nothing was
/// flipped.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_toggle_favorite(
    composer: *mut FfiOrderComposer,
    out_sync: *mut FfiFavoriteSync,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if composer.is_null() || out_sync.is_null() {
            return std::ptr::null_mut();
        }
        let composer = unsafe { &mut *composer };
        match composer.inner.toggle_favorite() {
            Ok(toggle) => {
                unsafe { out_sync.write(toggle.sync.into()) };
                FfiHttpRequest::from_core(toggle.request)
            }
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Report the outcome of a toggle's request. `sync` is the `FfiFavoriteSync`
/// value written by the toggle. Returns whether the service accepted it; a
/// failure does not revert the local flag. Returns false for a null argument
/// or an unknown `sync` value.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_finish_favorite(
    composer: *const FfiOrderComposer,
    sync: u32,
    response: *const FfiHttpResponse,
) -> bool {
    catch_unwind(|| {
        if composer.is_null() || response.is_null() {
            return false;
        }
        let Some(sync) = FfiFavoriteSync::from_raw(sync) else {
            return false;
        };
        let composer = unsafe { &*composer };
        let resp = unsafe { &*response };
        composer.inner.finish_favorite(sync.into(), resp.to_core())
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// Build `POST orders` from the current ledger. Returns null if `composer`
/// is null or the food or the favorites have not loaded.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_build_submit_order(composer: *const FfiOrderComposer) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if composer.is_null() {
            return std::ptr::null_mut();
        }
        match unsafe { &*composer }.inner.submit_order() {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the answer to `POST orders`. On success `payload` is the order id.
#[unsafe(no_mangle)]
pub extern "C" fn food_composer_finish_order(
    composer: *const FfiOrderComposer,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        if composer.is_null() {
            return FfiResult::null_arg("composer");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let composer = unsafe { &*composer };
        let resp = unsafe { &*response };
        match composer.inner.finish_order(resp.to_core()) {
            Ok(placed) => FfiResult::ok_payload(placed.id.to_string()),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in food_composer_finish_order"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `food_composer_build_*` or
/// `food_composer_toggle_favorite` call. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn food_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiResult`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn food_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.payload.is_null() {
            drop(unsafe { CString::from_raw(result.payload) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn food_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
