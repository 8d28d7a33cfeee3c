#[cfg(test)]
mod tests {
    use tracing::{debug, error, info, trace};
    use webform_macros::test_traced;

    #[test_traced("INFO")]
    fn test_info_level() {
        info!("This is an info log");
        debug!("This is a debug log (won't be shown)");
        assert_eq!(2 + 2, 4);
    }

    #[test_traced]
    fn test_default_level() {
        debug!("This is a debug log");
        assert_eq!(3 * 3, 9);
    }

    #[test_traced("ERROR")]
    fn test_error_level() {
        error!("This is an error log");
        assert_eq!(5 * 2, 10);
    }

    #[test_traced("TRACE")]
    fn test_trace_level() {
        trace!(field = "value", "This is a trace log");
        assert_eq!(7 + 7, 14);
    }

    #[test_traced("WARN")]
    #[should_panic(expected = "boom")]
    fn test_panic_propagates() {
        panic!("boom");
    }
}
