//! Signal Collector: fans one term out to every adapter and gathers the
//! results into a [`SignalSet`].

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use trendhunt_core::{Platform, SignalSample, SignalSet};

use crate::adapters::PlatformAdapter;

pub struct Collector {
    adapters: Vec<Arc<dyn PlatformAdapter>>,
    adapter_timeout: Duration,
    search_location: String,
}

impl Collector {
    #[must_use]
    pub fn new(
        adapters: Vec<Arc<dyn PlatformAdapter>>,
        adapter_timeout: Duration,
        search_location: impl Into<String>,
    ) -> Self {
        Self {
            adapters,
            adapter_timeout,
            search_location: search_location.into(),
        }
    }

    /// Platforms the collector reports on, configured or not.
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.adapters.iter().map(|a| a.platform()).collect()
    }

    /// Run every adapter for `term` concurrently and wait for all of them.
    ///
    /// Each call runs in its own task, bounded by the adapter timeout; a
    /// timeout or a panic only affects that adapter's sample. The result
    /// holds exactly one sample per platform, with zero samples for anything
    /// that failed.
    pub async fn collect_term(&self, term: &str) -> SignalSet {
        let calls = self.adapters.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            let platform = adapter.platform();
            let owned_term = term.to_string();
            let location = self.search_location.clone();
            let timeout = self.adapter_timeout;
            let task = tokio::spawn(async move {
                tokio::time::timeout(timeout, adapter.fetch(&owned_term, &location)).await
            });

            async move {
                match task.await {
                    Ok(Ok(sample)) => sample,
                    Ok(Err(_)) => {
                        tracing::warn!(
                            platform = %platform,
                            term,
                            timeout_secs = timeout.as_secs(),
                            "adapter timed out; using zero sample"
                        );
                        SignalSample::zero(platform)
                    }
                    Err(e) => {
                        tracing::warn!(
                            platform = %platform,
                            term,
                            error = %e,
                            "adapter task failed; using zero sample"
                        );
                        SignalSample::zero(platform)
                    }
                }
            }
        });

        let mut signals: SignalSet = join_all(calls).await.into_iter().collect();
        signals.fill_missing(&self.platforms());
        signals
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::SignalError;

    struct Fixed(Platform, f64);

    #[async_trait]
    impl PlatformAdapter for Fixed {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn fetch_raw(&self, _term: &str, _region: &str) -> Result<SignalSample, SignalError> {
            Ok(SignalSample {
                platform: self.0,
                current_intensity: self.1,
                velocity: 1.0,
                history: Vec::new(),
            })
        }
    }

    struct Slow(Platform);

    #[async_trait]
    impl PlatformAdapter for Slow {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn fetch_raw(&self, _term: &str, _region: &str) -> Result<SignalSample, SignalError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SignalSample {
                platform: self.0,
                current_intensity: 99.0,
                velocity: 0.0,
                history: Vec::new(),
            })
        }
    }

    struct Broken(Platform);

    #[async_trait]
    impl PlatformAdapter for Broken {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn fetch_raw(&self, _term: &str, _region: &str) -> Result<SignalSample, SignalError> {
            Err(SignalError::Api {
                source_name: "test",
                message: "unavailable".to_string(),
            })
        }
    }

    struct Panicking(Platform);

    #[async_trait]
    impl PlatformAdapter for Panicking {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn fetch_raw(&self, _term: &str, _region: &str) -> Result<SignalSample, SignalError> {
            panic!("adapter bug");
        }
    }

    fn collector(adapters: Vec<Arc<dyn PlatformAdapter>>) -> Collector {
        Collector::new(adapters, Duration::from_millis(50), "Minneapolis")
    }

    #[tokio::test]
    async fn one_sample_per_platform_with_failures_zeroed() {
        let collector = collector(vec![
            Arc::new(Fixed(Platform::TikTok, 80.0)),
            Arc::new(Broken(Platform::Yelp)),
            Arc::new(Slow(Platform::GoogleSearch)),
        ]);

        let signals = collector.collect_term("Birria Tacos").await;

        assert_eq!(signals.len(), 3);
        assert_eq!(
            signals.get(Platform::TikTok).unwrap().current_intensity,
            80.0
        );
        assert!(signals.get(Platform::Yelp).unwrap().is_zero());
        assert!(signals.get(Platform::GoogleSearch).unwrap().is_zero());
    }

    #[tokio::test]
    async fn slow_adapter_does_not_hold_up_siblings_past_timeout() {
        let collector = collector(vec![
            Arc::new(Slow(Platform::Reddit)),
            Arc::new(Slow(Platform::Pinterest)),
            Arc::new(Fixed(Platform::TikTok, 10.0)),
        ]);

        let started = tokio::time::Instant::now();
        let signals = collector.collect_term("Mochi Donuts").await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(signals.get(Platform::TikTok).unwrap().current_intensity, 10.0);
        assert!(signals.get(Platform::Reddit).unwrap().is_zero());
    }

    #[tokio::test]
    async fn panicking_adapter_becomes_zero_sample() {
        let collector = collector(vec![
            Arc::new(Fixed(Platform::TikTok, 70.0)),
            Arc::new(Panicking(Platform::Pinterest)),
        ]);

        let signals = collector.collect_term("Korean Corn Dogs").await;

        assert_eq!(signals.len(), 2);
        assert_eq!(signals.get(Platform::TikTok).unwrap().current_intensity, 70.0);
        assert!(signals.get(Platform::Pinterest).unwrap().is_zero());
    }

    #[tokio::test]
    async fn duplicate_platform_adapters_yield_one_sample() {
        let collector = collector(vec![
            Arc::new(Fixed(Platform::Reddit, 40.0)),
            Arc::new(Fixed(Platform::Reddit, 90.0)),
        ]);
        let signals = collector.collect_term("Ube Lattes").await;
        assert_eq!(signals.len(), 1);
        assert_eq!(signals.get(Platform::Reddit).unwrap().current_intensity, 40.0);
    }
}
