//! File-backed SQLite store holding the `orders` relation.
//!
//! The table is replaced wholesale on every load: drop, create, insert, all in
//! one transaction. Readers open the file read-only and never write.
//!
//! A `Store` owns its connection; it is opened for one operation and closed
//! when dropped.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, params};

use crate::domain::OrderLine;
use crate::error::AppError;

pub const ORDERS_TABLE: &str = "orders";

/// Text layout of `InvoiceDate`; SQLite's date functions understand it.
pub const DATE_STORAGE_FMT: &str = "%Y-%m-%d %H:%M:%S";

const CREATE_ORDERS: &str = "CREATE TABLE orders (
    InvoiceNo TEXT,
    StockCode TEXT,
    Description TEXT,
    Quantity INTEGER,
    InvoiceDate TEXT,
    UnitPrice REAL,
    CustomerID REAL,
    Country TEXT
)";

const INSERT_ORDER: &str = "INSERT INTO orders
    (InvoiceNo, StockCode, Description, Quantity, InvoiceDate, UnitPrice, CustomerID, Country)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open (or create) the store for writing.
    pub fn open_for_write(path: &Path) -> Result<Self, AppError> {
        let conn = Connection::open(path).map_err(|e| {
            AppError::persist(format!("Failed to open store '{}': {e}", path.display()))
        })?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing, populated store for reading.
    ///
    /// A missing file or a file without the `orders` table means nothing has
    /// been loaded yet, which is reported as `NoData`.
    pub fn open_read_only(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(not_loaded(path));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| AppError::query(format!("Failed to open store '{}': {e}", path.display())))?;

        let store = Self {
            conn,
            path: path.to_path_buf(),
        };
        if !store.has_orders_table()? {
            return Err(not_loaded(path));
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Replace the contents of `orders` with `lines`.
    ///
    /// On failure the transaction rolls back and the previous table survives.
    pub fn replace_orders(&mut self, lines: &[OrderLine]) -> Result<usize, AppError> {
        let path = self.path.display().to_string();
        let persist = |e: rusqlite::Error| AppError::persist(format!("Failed to write orders to '{path}': {e}"));

        let tx = self.conn.transaction().map_err(persist)?;
        tx.execute_batch("DROP TABLE IF EXISTS orders;").map_err(persist)?;
        tx.execute_batch(CREATE_ORDERS).map_err(persist)?;

        {
            let mut stmt = tx.prepare(INSERT_ORDER).map_err(persist)?;
            for line in lines {
                stmt.execute(params![
                    line.invoice_no,
                    line.stock_code,
                    line.description,
                    line.quantity,
                    line.invoice_date.format(DATE_STORAGE_FMT).to_string(),
                    line.unit_price,
                    line.customer_id,
                    line.country,
                ])
                .map_err(persist)?;
            }
        }

        tx.commit().map_err(persist)?;
        log::info!("Replaced `{ORDERS_TABLE}` with {} row(s) in {}", lines.len(), self.path.display());
        Ok(lines.len())
    }

    pub fn row_count(&self) -> Result<i64, AppError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
            .map_err(|e| AppError::query(format!("Failed to count orders: {e}")))
    }

    fn has_orders_table(&self) -> Result<bool, AppError> {
        let n: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [ORDERS_TABLE],
                |row| row.get(0),
            )
            .map_err(|e| AppError::query(format!("Failed to inspect store schema: {e}")))?;
        Ok(n > 0)
    }
}

fn not_loaded(path: &Path) -> AppError {
    AppError::no_data(format!(
        "No orders loaded in '{}'. Run `ri analyze -f <file.csv>` first.",
        path.display()
    ))
}
