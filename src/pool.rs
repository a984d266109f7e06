//! Per-thread decoder reuse.
//!
//! Each thread lazily creates one [`JpegDecompressor`] with the default
//! configuration and keeps it for its whole lifetime, so a worker decoding
//! many images pays handle creation once. The handle is dropped with the
//! thread.

use core::cell::RefCell;

use crate::decompressor::JpegDecompressor;
use crate::error::DecodeError;

thread_local! {
    static THREAD_DECOMPRESSOR: RefCell<Option<JpegDecompressor>> = const { RefCell::new(None) };
}

/// Run `f` with this thread's decoder handle, creating it on first use.
///
/// Re-entrant calls (from inside `f`) get a fresh temporary handle instead of
/// the thread's shared one.
pub fn with_thread_decompressor<R>(
    f: impl FnOnce(&mut JpegDecompressor) -> Result<R, DecodeError>,
) -> Result<R, DecodeError> {
    THREAD_DECOMPRESSOR.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            log::trace!("thread decompressor busy, using a temporary handle");
            let mut decompressor = JpegDecompressor::new()?;
            return f(&mut decompressor);
        };
        let mut decompressor = match slot.take() {
            Some(d) => d,
            None => JpegDecompressor::new()?,
        };
        let result = f(&mut decompressor);
        *slot = Some(decompressor);
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_survives_between_calls() {
        with_thread_decompressor(|d| {
            let _ = d.read_dimensions(&[]);
            Ok(())
        })
        .unwrap();
        // Same handle: the failure from the previous call is still recorded.
        let code = with_thread_decompressor(|d| Ok(d.last_error().map(|e| e.code))).unwrap();
        assert_eq!(code, Some(crate::error::code::EMPTY_INPUT));
    }

    #[test]
    fn reentrant_use_gets_its_own_handle() {
        let nested = with_thread_decompressor(|_outer| {
            with_thread_decompressor(|inner| Ok(inner.last_error().is_none()))
        })
        .unwrap();
        assert!(nested);
    }

    #[test]
    fn threads_do_not_share_handles() {
        with_thread_decompressor(|d| {
            let _ = d.read_dimensions(&[]);
            Ok(())
        })
        .unwrap();
        let other = std::thread::spawn(|| {
            with_thread_decompressor(|d| Ok(d.last_error().is_none())).unwrap()
        })
        .join()
        .unwrap();
        assert!(other);
    }
}
