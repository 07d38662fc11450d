/// Logs an error with context and moves on, for failures that must not
/// unwind the prompt loop.
macro_rules! log_if_err {
    ($result:expr, $($arg:tt)*) => {
        if let Err(ref e) = $result {
            log::error!("{}: {}", format_args!($($arg)*), e);
        }
    };
}
