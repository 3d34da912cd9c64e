//! Factory Method: pick a database driver from a connection URL.
//!
//! Callers only ever see `Box<dyn Database>`; the scheme decides which mock
//! driver sits behind it.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub engine: &'static str,
    pub rows: Vec<Vec<String>>,
}

pub trait Database {
    fn engine(&self) -> &'static str;
    fn connect(&self) -> String;

    fn query(&self, sql: &str) -> QueryResult {
        tracing::debug!(engine = self.engine(), sql, "mock query");
        QueryResult {
            engine: self.engine(),
            rows: vec![
                vec!["1".into(), "alice".into()],
                vec!["2".into(), "bob".into()],
            ],
        }
    }
}

pub struct PostgresDatabase {
    host: String,
    port: u16,
    database: String,
}

impl Database for PostgresDatabase {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    fn connect(&self) -> String {
        format!("Connected to PostgreSQL at {}:{}/{}", self.host, self.port, self.database)
    }
}

pub struct MySqlDatabase {
    host: String,
    port: u16,
}

impl Database for MySqlDatabase {
    fn engine(&self) -> &'static str {
        "mysql"
    }

    fn connect(&self) -> String {
        format!("Connected to MySQL at {}:{}", self.host, self.port)
    }
}

pub struct SqliteDatabase {
    path: String,
}

impl Database for SqliteDatabase {
    fn engine(&self) -> &'static str {
        "sqlite"
    }

    fn connect(&self) -> String {
        if self.path.is_empty() || self.path == ":memory:" {
            "Opened in-memory SQLite database".to_string()
        } else {
            format!("Opened SQLite file {}", self.path)
        }
    }

    // SQLite answers with a single row to keep the drivers distinguishable.
    fn query(&self, _sql: &str) -> QueryResult {
        QueryResult {
            engine: self.engine(),
            rows: vec![vec!["1".into(), "alice".into()]],
        }
    }
}

pub struct DatabaseFactory;

impl DatabaseFactory {
    pub fn from_url(raw: &str) -> Result<Box<dyn Database>> {
        let url = Url::parse(raw)?;
        let host = url.host_str().unwrap_or("localhost").to_string();

        match url.scheme() {
            "postgres" | "postgresql" => Ok(Box::new(PostgresDatabase {
                host,
                port: url.port().unwrap_or(5432),
                database: url.path().trim_start_matches('/').to_string(),
            })),
            "mysql" => Ok(Box::new(MySqlDatabase {
                host,
                port: url.port().unwrap_or(3306),
            })),
            "sqlite" => Ok(Box::new(SqliteDatabase {
                path: format!("{}{}", url.host_str().unwrap_or(""), url.path()),
            })),
            other => Err(PatternError::UnsupportedDatabase(other.to_string())),
        }
    }
}

/// The textbook shape: subclasses (here, implementors) override the
/// factory method while the report logic stays in the provided method.
pub trait ReportCreator {
    fn create_database(&self) -> Box<dyn Database>;

    fn run_report(&self) -> String {
        let db = self.create_database();
        let result = db.query("SELECT id, name FROM users");
        format!("{}: {} row(s)", db.engine(), result.rows.len())
    }
}

pub struct AnalyticsReport;

impl ReportCreator for AnalyticsReport {
    fn create_database(&self) -> Box<dyn Database> {
        Box::new(PostgresDatabase {
            host: "warehouse".into(),
            port: 5432,
            database: "analytics".into(),
        })
    }
}

pub struct EmbeddedReport;

impl ReportCreator for EmbeddedReport {
    fn create_database(&self) -> Box<dyn Database> {
        Box::new(SqliteDatabase { path: ":memory:".into() })
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    ctx.section("Drivers from connection URLs");
    let urls = [
        "postgres://db.internal:5433/shop",
        "mysql://legacy-host/app",
        "sqlite::memory:",
        "oracle://mainframe/ledger",
        "definitely not a url",
    ];
    for raw in urls {
        match DatabaseFactory::from_url(raw) {
            Ok(db) => {
                println!("{}", db.connect());
                let result = db.query("SELECT id, name FROM users");
                println!("  {} returned {} row(s): {:?}", result.engine, result.rows.len(), result.rows);
            }
            Err(err) => println!("{raw}: {err}"),
        }
    }

    ctx.section("Creator with an overridable factory method");
    let creators: Vec<Box<dyn ReportCreator>> = vec![Box::new(AnalyticsReport), Box::new(EmbeddedReport)];
    for creator in &creators {
        println!("{}", creator.run_report());
    }

    Ok(())
}
