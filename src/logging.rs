//! Logging macros.
//!
//! - `board`: forwarded to `defmt` (RTT).
//! - Host unit tests: printed with `println!`.
//! - Anything else: compiled out, arguments are still type-checked.
//!
//! Arguments must implement both `defmt::Format` and `core::fmt::Display`, and only plain `{}`
//! placeholders are allowed, so one format string works for both backends.

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "board")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "board"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(feature = "board"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "board")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "board"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(all(not(feature = "board"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "board")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "board"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(feature = "board"), not(test)))]
        let _ = format_args!($($arg)*);
    }};
}
