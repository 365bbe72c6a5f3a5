/// Records a message into the thread-local test log.
///
/// Does nothing unless the `for_testing` feature is enabled.
macro_rules! test_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "for_testing")]
        $crate::testing::log_message(&format!($($arg)*));
    };
}
