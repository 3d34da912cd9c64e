//! Proxy: stand-ins with the same interface as a slow remote price API.
//!
//! * `CachingProxy` answers repeated symbols from memory. Concurrent misses
//!   on one symbol share a single remote call.
//! * `RateLimitProxy` refuses calls beyond a per-window budget.
//! * `AccessProxy` checks an API key against a stored SHA-256 digest.
//!
//! The latency is simulated with `tokio::time::sleep`; nothing leaves the
//! process.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

#[async_trait]
pub trait PriceService: Send + Sync {
    async fn price(&self, symbol: &str) -> Result<f64>;
}

pub struct RemotePriceApi {
    latency: Duration,
    jitter: bool,
    quotes: HashMap<&'static str, f64>,
    calls: AtomicUsize,
}

impl RemotePriceApi {
    pub fn new(latency: Duration) -> Self {
        let quotes = [("AAPL", 189.5), ("MSFT", 415.2), ("RUST", 1.0), ("TSLA", 172.8)]
            .into_iter()
            .collect();
        Self {
            latency,
            jitter: true,
            quotes,
            calls: AtomicUsize::new(0),
        }
    }

    /// Same quote every time; for tests.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceService for RemotePriceApi {
    async fn price(&self, symbol: &str) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(symbol, "fetching price from remote API");
        tokio::time::sleep(self.latency).await;

        let base = *self
            .quotes
            .get(symbol)
            .ok_or_else(|| PatternError::Validation(format!("unknown symbol {symbol}")))?;
        if !self.jitter {
            return Ok(base);
        }
        let drift = rand::thread_rng().gen_range(-0.01..0.01);
        Ok((base * (1.0 + drift) * 100.0).round() / 100.0)
    }
}

// Blanket impl so proxies can wrap an `Arc` and the demo can keep a handle
// on the real subject to read its call counter.
#[async_trait]
impl<T: PriceService + ?Sized> PriceService for Arc<T> {
    async fn price(&self, symbol: &str) -> Result<f64> {
        (**self).price(symbol).await
    }
}

pub struct CachingProxy<S> {
    inner: S,
    cache: Mutex<HashMap<String, Arc<OnceCell<f64>>>>,
    hits: AtomicUsize,
}

impl<S: PriceService> CachingProxy<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// The slot for `symbol`, created empty on first use.
    fn slot(&self, symbol: &str) -> Result<Arc<OnceCell<f64>>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| PatternError::Validation("price cache lock poisoned".into()))?;
        Ok(Arc::clone(cache.entry(symbol.to_string()).or_default()))
    }
}

#[async_trait]
impl<S: PriceService> PriceService for CachingProxy<S> {
    async fn price(&self, symbol: &str) -> Result<f64> {
        let slot = self.slot(symbol)?;
        let mut fetched = false;
        // A failed fetch leaves the slot empty, so errors are not cached.
        let price = *slot
            .get_or_try_init(|| {
                fetched = true;
                self.inner.price(symbol)
            })
            .await?;
        if !fetched {
            self.hits.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(symbol, "cache hit");
        }
        Ok(price)
    }
}

pub struct RateLimitProxy<S> {
    inner: S,
    limit: u32,
    window: Duration,
    state: Mutex<(Instant, u32)>,
}

impl<S: PriceService> RateLimitProxy<S> {
    pub fn new(inner: S, limit: u32, window: Duration) -> Self {
        Self {
            inner,
            limit,
            window,
            state: Mutex::new((Instant::now(), 0)),
        }
    }

    fn try_acquire(&self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| PatternError::Validation("rate limiter lock poisoned".into()))?;
        let (window_start, used) = &mut *state;
        if window_start.elapsed() >= self.window {
            *window_start = Instant::now();
            *used = 0;
        }
        if *used >= self.limit {
            return Err(PatternError::RateLimitExceeded { limit: self.limit });
        }
        *used += 1;
        Ok(())
    }
}

#[async_trait]
impl<S: PriceService> PriceService for RateLimitProxy<S> {
    async fn price(&self, symbol: &str) -> Result<f64> {
        self.try_acquire()?;
        self.inner.price(symbol).await
    }
}

pub fn digest(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}

pub struct AccessProxy<S> {
    inner: S,
    expected: [u8; 32],
    presented: String,
}

impl<S: PriceService> AccessProxy<S> {
    /// `expected` is the stored digest; `presented` is the caller's key.
    pub fn new(inner: S, expected: [u8; 32], presented: impl Into<String>) -> Self {
        Self {
            inner,
            expected,
            presented: presented.into(),
        }
    }
}

#[async_trait]
impl<S: PriceService> PriceService for AccessProxy<S> {
    async fn price(&self, symbol: &str) -> Result<f64> {
        if digest(&self.presented) != self.expected {
            return Err(PatternError::AccessDenied("API key does not match".into()));
        }
        self.inner.price(symbol).await
    }
}

async fn run(ctx: &DemoContext) -> Result<()> {
    let remote = Arc::new(RemotePriceApi::new(ctx.latency()));

    ctx.section("Caching proxy");
    let cached = CachingProxy::new(Arc::clone(&remote));
    for symbol in ["AAPL", "MSFT", "AAPL", "AAPL", "MSFT"] {
        let started = Instant::now();
        let price = cached.price(symbol).await?;
        println!("{symbol}: {price:.2} ({} ms)", started.elapsed().as_millis());
    }
    println!("Remote calls: {}, cache hits: {}", remote.calls(), cached.hits());

    ctx.section("Concurrent lookups through the cache");
    let symbols = ["RUST", "TSLA", "AAPL"];
    let quotes = futures::future::join_all(symbols.iter().map(|s| cached.price(s))).await;
    for (symbol, quote) in symbols.iter().zip(quotes) {
        println!("{symbol}: {:.2}", quote?);
    }

    ctx.section("Rate-limiting proxy");
    let limited = RateLimitProxy::new(Arc::clone(&remote), ctx.config.rate_limit, Duration::from_secs(60));
    let requests = ctx.config.rate_limit.min(5) + 2;
    for i in 1..=requests {
        match limited.price("MSFT").await {
            Ok(price) => println!("request {i}: {price:.2}"),
            Err(err) => println!("request {i}: {err}"),
        }
    }

    ctx.section("Access proxy");
    let stored = digest("s3cr3t-key");
    for key in ["s3cr3t-key", "guess"] {
        let guarded = AccessProxy::new(Arc::clone(&remote), stored, key);
        match guarded.price("AAPL").await {
            Ok(price) => println!("key {key:?}: AAPL {price:.2}"),
            Err(err) => println!("key {key:?}: {err}"),
        }
    }

    match remote.price("NOPE").await {
        Ok(_) => println!("Unexpected quote"),
        Err(err) => println!("Remote says: {err}"),
    }

    Ok(())
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.runtime()?.block_on(run(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn api() -> Arc<RemotePriceApi> {
        Arc::new(RemotePriceApi::new(Duration::ZERO).without_jitter())
    }

    #[tokio::test]
    async fn test_cache_hits_skip_remote() {
        let remote = api();
        let proxy = CachingProxy::new(Arc::clone(&remote));

        assert_eq!(proxy.price("AAPL").await.unwrap(), 189.5);
        assert_eq!(proxy.price("AAPL").await.unwrap(), 189.5);
        assert_eq!(remote.calls(), 1);
        assert_eq!(proxy.hits(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let remote = api();
        let proxy = CachingProxy::new(Arc::clone(&remote));
        assert!(proxy.price("NOPE").await.is_err());
        assert!(proxy.price("NOPE").await.is_err());
        assert_eq!(remote.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_call() {
        let remote = Arc::new(RemotePriceApi::new(Duration::from_millis(20)).without_jitter());
        let proxy = CachingProxy::new(Arc::clone(&remote));

        let quotes = futures::future::join_all((0..3).map(|_| proxy.price("TSLA"))).await;
        for quote in quotes {
            assert_eq!(quote.unwrap(), 172.8);
        }
        assert_eq!(remote.calls(), 1);
        assert_eq!(proxy.hits(), 2);
    }

    #[test]
    fn test_demo_with_largest_rate_limit() {
        let config = CatalogConfig {
            rate_limit: crate::config::MAX_RATE_LIMIT,
            ..CatalogConfig::quiet()
        };
        assert!(config.validate().is_ok());
        demo(&DemoContext::new(config)).unwrap();
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let proxy = RateLimitProxy::new(api(), 2, Duration::from_secs(60));
        assert!(proxy.price("RUST").await.is_ok());
        assert!(proxy.price("RUST").await.is_ok());
        let err = proxy.price("RUST").await.unwrap_err();
        assert!(matches!(err, PatternError::RateLimitExceeded { limit: 2 }));
    }

    #[tokio::test]
    async fn test_rate_limit_window_resets() {
        let proxy = RateLimitProxy::new(api(), 1, Duration::ZERO);
        assert!(proxy.price("RUST").await.is_ok());
        assert!(proxy.price("RUST").await.is_ok());
    }

    #[tokio::test]
    async fn test_access_proxy() {
        let stored = digest("right");
        let ok = AccessProxy::new(api(), stored, "right");
        let bad = AccessProxy::new(api(), stored, "wrong");

        assert_eq!(ok.price("RUST").await.unwrap(), 1.0);
        assert!(matches!(bad.price("RUST").await, Err(PatternError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_jitter_stays_close() {
        let remote = RemotePriceApi::new(Duration::ZERO);
        let price = remote.price("MSFT").await.unwrap();
        assert!((price - 415.2).abs() < 5.0);
    }
}
