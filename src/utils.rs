/// Records a checkpoint into the thread-local log of [testing](crate::testing).
/// Compiles to nothing without the `for_testing` feature.
macro_rules! test_log {
    ($msg:expr) => {
        #[cfg(feature = "for_testing")]
        {
            crate::testing::log_message($msg);
        }
    };
}
