//! Singleton: one lazily-created instance for the whole process.
//!
//! Two flavours: `OnceLock` for immutable settings and `lazy_static!`
//! for a mutable pool guarded by a `Mutex`. Both are still globals;
//! `ConnectionPool::new` shows the injectable alternative.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use lazy_static::lazy_static;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

static SETTINGS_INITS: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
pub struct AppSettings {
    pub app_name: String,
    pub environment: String,
    pub debug: bool,
}

impl AppSettings {
    pub fn global() -> &'static AppSettings {
        static SETTINGS: OnceLock<AppSettings> = OnceLock::new();
        SETTINGS.get_or_init(|| {
            SETTINGS_INITS.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("initialising AppSettings");
            AppSettings {
                app_name: "pattern-catalog".to_string(),
                environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                debug: cfg!(debug_assertions),
            }
        })
    }

    /// How many times the initialiser actually ran.
    pub fn init_count() -> usize {
        SETTINGS_INITS.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: usize,
}

impl Connection {
    pub fn execute(&self, sql: &str) -> String {
        format!("[conn #{}] {}", self.id, sql)
    }
}

#[derive(Debug)]
pub struct ConnectionPool {
    size: usize,
    idle: Mutex<Vec<Connection>>,
}

lazy_static! {
    static ref SHARED_POOL: Arc<ConnectionPool> = Arc::new(ConnectionPool::new(2));
}

impl ConnectionPool {
    pub fn new(size: usize) -> Self {
        let idle = (1..=size).rev().map(|id| Connection { id }).collect();
        Self {
            size,
            idle: Mutex::new(idle),
        }
    }

    pub fn shared() -> Arc<ConnectionPool> {
        Arc::clone(&SHARED_POOL)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn available(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }

    pub fn acquire(&self) -> Result<PooledConnection<'_>> {
        let mut idle = self
            .idle
            .lock()
            .map_err(|_| PatternError::Validation("connection pool lock poisoned".into()))?;
        match idle.pop() {
            Some(conn) => {
                tracing::debug!(id = conn.id, "connection checked out");
                Ok(PooledConnection { pool: self, conn })
            }
            None => Err(PatternError::PoolExhausted { size: self.size }),
        }
    }

    fn release(&self, conn: Connection) {
        tracing::debug!(id = conn.id, "connection returned");
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(conn);
        }
    }
}

/// Returned to the pool when dropped.
#[derive(Debug)]
pub struct PooledConnection<'a> {
    pool: &'a ConnectionPool,
    conn: Connection,
}

impl std::ops::Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        self.pool.release(self.conn.clone());
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("OnceLock settings");
    let first = AppSettings::global();
    let second = AppSettings::global();
    println!("app_name: {}, environment: {}, debug: {}", first.app_name, first.environment, first.debug);
    println!("Same instance: {}", std::ptr::eq(first, second));
    println!("Initialiser ran {} time(s)", AppSettings::init_count());

    ctx.section("lazy_static! connection pool");
    let pool = ConnectionPool::shared();
    let again = ConnectionPool::shared();
    println!("Same pool: {}", Arc::ptr_eq(&pool, &again));
    {
        let a = pool.acquire()?;
        let b = pool.acquire()?;
        println!("{}", a.execute("SELECT 1"));
        println!("{}", b.execute("SELECT 2"));
        match pool.acquire() {
            Ok(_) => println!("Unexpected third connection"),
            Err(err) => println!("Third acquire failed: {err}"),
        }
    }
    println!("After guards dropped: {} available", pool.available());

    ctx.section("Injected pool instead of a global");
    let local = ConnectionPool::new(ctx.config.pool_size);
    let conn = local.acquire()?;
    println!("Local pool of {} handed out {}", local.size(), conn.execute("SELECT now()"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_is_a_single_instance() {
        let a = AppSettings::global();
        let b = AppSettings::global();
        assert!(std::ptr::eq(a, b));
        assert_eq!(AppSettings::init_count(), 1);
    }

    #[test]
    fn test_shared_pool_is_a_single_instance() {
        assert!(Arc::ptr_eq(&ConnectionPool::shared(), &ConnectionPool::shared()));
    }

    #[test]
    fn test_pool_exhaustion_and_release() {
        let pool = ConnectionPool::new(1);
        let conn = pool.acquire().unwrap();
        assert_eq!(conn.id, 1);
        assert!(matches!(pool.acquire(), Err(PatternError::PoolExhausted { size: 1 })));

        drop(conn);
        assert_eq!(pool.available(), 1);
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn test_connections_handed_out_in_order() {
        let pool = ConnectionPool::new(3);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(pool.available(), 1);
    }
}
