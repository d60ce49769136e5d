use std::time::Duration;

/// Timing knobs for one rebuild cycle.
///
/// Defaults are the reference values from the original system; both waits are
/// best-effort and exceeding them proceeds rather than failing the cycle.
#[derive(Debug, Clone)]
pub struct RebuildConfig {
	/// Upper bound on the wait for the subject to finish an in-progress draw.
	pub draw_wait_timeout: Duration,
	/// Upper bound on the presence poll loop.
	pub presence_timeout: Duration,
	/// Interval between presence probes.
	pub presence_poll_interval: Duration,
}

impl Default for RebuildConfig {
	fn default() -> Self {
		Self {
			draw_wait_timeout: Duration::from_secs(30),
			presence_timeout: Duration::from_secs(10),
			presence_poll_interval: Duration::from_millis(50),
		}
	}
}
