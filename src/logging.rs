//! Optional startup logging for this crate.
//!
//! Enabled by the `setup_tracing` feature. Logging stays off unless
//! `DEBUG_DBSCAN2D` is set to a truthy value, so pulling this crate in as a
//! dependency never installs a global subscriber behind the caller's back.

#[cfg(feature = "setup_tracing")]
mod imp {
    use ctor::ctor;
    use tracing::Level;

    #[ctor]
    fn set_debug_level() {
        let enabled = std::env::var("DEBUG_DBSCAN2D")
            .map(|v| !(v == "0" || v == "false" || v.is_empty()))
            .unwrap_or(false);
        if enabled {
            tracing_subscriber::fmt()
                .with_max_level(Level::DEBUG)
                .init();
        }
    }
}
