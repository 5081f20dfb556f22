//! Logging shims.
//!
//! Device builds (`no_std`) go through defmt, host builds (`std`) through the
//! `log` facade. Without either feature the macros expand to nothing and the
//! arguments are only type-checked.

#![allow(unused_macros)]

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "no_std")]
        defmt::debug!($($arg)*);
        #[cfg(all(feature = "std", not(feature = "no_std")))]
        log::debug!($($arg)*);
        #[cfg(not(any(feature = "std", feature = "no_std")))]
        let _ = ($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "no_std")]
        defmt::warn!($($arg)*);
        #[cfg(all(feature = "std", not(feature = "no_std")))]
        log::warn!($($arg)*);
        #[cfg(not(any(feature = "std", feature = "no_std")))]
        let _ = ($($arg)*);
    }};
}

pub(crate) use log_debug;
pub(crate) use log_warn;
