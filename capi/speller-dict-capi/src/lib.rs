use log::warn;
use speller_dict::{Backend, Dictionary, DictionaryConfig, SpellDictionary};
use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

const SPELLER_DICT_ABI_NUMBER: u32 = 1;

// Per-thread, like errno.
thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(msg.to_string()));
}

fn get_last_error() -> Option<String> {
    LAST_ERROR.with(|e| e.borrow().clone())
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

/// Returns the C ABI version number.
/// This value changes ONLY when the C ABI is broken.
#[no_mangle]
pub extern "C" fn speller_dict_abi_number() -> u32 {
    SPELLER_DICT_ABI_NUMBER
}

/// Returns the speller-dict version string (UTF-8, null-terminated).
///
/// The returned pointer is valid for the lifetime of the program.
#[no_mangle]
pub extern "C" fn speller_dict_version_string() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Creates an empty dictionary. `backend`: 0 = hash table, 1 = trie.
///
/// Returns NULL (and sets the last error) for an unknown backend code.
/// Release with `speller_dict_delete`.
#[no_mangle]
pub extern "C" fn speller_dict_new(backend: u32) -> *mut SpellDictionary {
    match Backend::from_ffi(backend) {
        Some(backend) => {
            clear_last_error();
            Box::into_raw(Box::new(SpellDictionary::new(&DictionaryConfig::new(backend))))
        }
        None => {
            set_last_error(&format!("Invalid backend: {}", backend));
            ptr::null_mut()
        }
    }
}

/// Creates an empty dictionary from a JSON config string, e.g.
/// `{"backend":"trie","oversize":"truncate"}`.
///
/// # Safety
/// `config_json` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub extern "C" fn speller_dict_new_with_config(config_json: *const c_char) -> *mut SpellDictionary {
    let json = match decode_utf8(config_json, "config") {
        Some(s) => s,
        None => return ptr::null_mut(),
    };

    match DictionaryConfig::from_json_str(json) {
        Ok(config) => {
            clear_last_error();
            Box::into_raw(Box::new(SpellDictionary::new(&config)))
        }
        Err(err) => {
            set_last_error(&err.to_string());
            ptr::null_mut()
        }
    }
}

/// Destroys a dictionary created by `speller_dict_new*`. NULL is ignored.
///
/// # Safety
/// `instance` must come from `speller_dict_new*` and must not be used afterwards.
#[no_mangle]
pub extern "C" fn speller_dict_delete(instance: *mut SpellDictionary) {
    if !instance.is_null() {
        unsafe {
            let _ = Box::from_raw(instance);
        }
    }
}

/// Loads the word list at `path`. Returns false on failure; see `speller_dict_last_error`.
///
/// Words read before a failure stay loaded; `speller_dict_unload` is always safe.
///
/// # Safety
/// `instance` must be NULL or a live dictionary; `path` NULL or NUL-terminated.
#[no_mangle]
pub extern "C" fn speller_dict_load(instance: *mut SpellDictionary, path: *const c_char) -> bool {
    if instance.is_null() {
        set_last_error("Invalid argument: instance is NULL");
        return false;
    }
    let path = match decode_utf8(path, "path") {
        Some(p) => p,
        None => return false,
    };

    let dict = unsafe { &mut *instance };
    match dict.load(path) {
        Ok(()) => {
            clear_last_error();
            true
        }
        Err(err) => {
            warn!("speller_dict_load failed: {}", err);
            set_last_error(&err.to_string());
            false
        }
    }
}

/// Returns true iff `word` is in the dictionary (ASCII case-insensitive).
///
/// A NULL or non-UTF-8 word is reported as not found and sets the last error.
///
/// # Safety
/// `instance` must be NULL or a live dictionary; `word` NULL or NUL-terminated.
#[no_mangle]
pub extern "C" fn speller_dict_check(instance: *const SpellDictionary, word: *const c_char) -> bool {
    if instance.is_null() {
        set_last_error("Invalid argument: instance is NULL");
        return false;
    }
    let word = match decode_utf8(word, "word") {
        Some(w) => w,
        None => return false,
    };

    let dict = unsafe { &*instance };
    dict.check(word)
}

/// Number of loaded words; 0 for NULL or an unloaded dictionary.
/// Saturates at `u32::MAX`.
///
/// # Safety
/// `instance` must be NULL or a live dictionary.
#[no_mangle]
pub extern "C" fn speller_dict_size(instance: *const SpellDictionary) -> u32 {
    if instance.is_null() {
        return 0;
    }
    let dict = unsafe { &*instance };
    u32::try_from(dict.size()).unwrap_or(u32::MAX)
}

/// Releases every loaded word. The handle stays valid and can be loaded again.
///
/// # Safety
/// `instance` must be NULL or a live dictionary.
#[no_mangle]
pub extern "C" fn speller_dict_unload(instance: *mut SpellDictionary) -> bool {
    if instance.is_null() {
        set_last_error("Invalid argument: instance is NULL");
        return false;
    }
    let dict = unsafe { &mut *instance };
    dict.unload()
}

/// Returns the calling thread's last error as a heap string, or "No error".
///
/// Caller must free it with `speller_dict_string_free`.
#[no_mangle]
pub extern "C" fn speller_dict_last_error() -> *mut c_char {
    let msg: String = match get_last_error() {
        Some(err) if !err.is_empty() => err,
        _ => "No error".to_string(),
    };

    // Never panic across FFI boundary
    make_c_string_or_fallback(&msg, "No error")
}

#[no_mangle]
pub extern "C" fn speller_dict_clear_last_error() {
    clear_last_error();
}

/// Frees a string returned by this library. NULL is ignored.
///
/// # Safety
/// `ptr` must come from this library and must not be freed twice.
#[no_mangle]
pub extern "C" fn speller_dict_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        };
    }
}

// ------ Core Shared Helpers ------

#[inline]
fn make_c_string_or_fallback(s: &str, fallback: &'static str) -> *mut c_char {
    CString::new(s)
        .or_else(|_| CString::new(fallback))
        .unwrap_or_default()
        .into_raw()
}

/// Borrows a C string as UTF-8, setting the last error on NULL or bad UTF-8.
#[inline]
fn decode_utf8<'a>(ptr_: *const c_char, what: &'static str) -> Option<&'a str> {
    if ptr_.is_null() {
        set_last_error(&format!("Invalid argument: {} is NULL", what));
        return None;
    }
    match unsafe { CStr::from_ptr(ptr_) }.to_str() {
        Ok(v) => Some(v),
        Err(_) => {
            set_last_error(&format!("Invalid UTF-8 {}", what));
            None
        }
    }
}

// ------ C API Tests ------
