//! SQLite 预约存储
//!
//! 预约请求保存在单张 `appointments` 表中

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::info;

use crate::core::store::AppointmentStore;
use crate::domain::{Appointment, NewAppointment};

const SELECT_COLUMNS: &str = "
    id, created_at, name, phone, email, location, service_type,
    vehicle_make, vehicle_model, vehicle_year,
    preferred_date, preferred_time, notes";

/// SQLite 存储
pub struct SqliteAppointmentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAppointmentStore {
    /// 打开（或创建）数据库文件
    ///
    /// 会自动创建缺失的父目录
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        info!("appointment database opened at {}", db_path.display());
        Self::with_connection(conn)
    }

    /// 内存数据库（测试用）
    pub fn new_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// 初始化数据库表（幂等）
    fn init_schema(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire database lock: {}", e))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS appointments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at INTEGER NOT NULL,
                name TEXT NOT NULL,
                phone TEXT,
                email TEXT,
                location TEXT,
                service_type TEXT,
                vehicle_make TEXT,
                vehicle_model TEXT,
                vehicle_year TEXT,
                preferred_date TEXT,
                preferred_time TEXT,
                notes TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_appointments_created ON appointments(created_at);
            ",
        )?;

        Ok(())
    }

    /// 在阻塞线程池中执行数据库操作
    async fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| anyhow::anyhow!("Failed to acquire database lock: {}", e))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task failed: {}", e))?
    }
}

fn row_to_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let created_at: i64 = row.get(1)?;

    Ok(Appointment {
        id: row.get(0)?,
        created_at: DateTime::from_timestamp_millis(created_at).unwrap_or_default(),
        details: NewAppointment {
            name: row.get(2)?,
            phone: row.get(3)?,
            email: row.get(4)?,
            location: row.get(5)?,
            service_type: row.get(6)?,
            vehicle_make: row.get(7)?,
            vehicle_model: row.get(8)?,
            vehicle_year: row.get(9)?,
            preferred_date: row.get(10)?,
            preferred_time: row.get(11)?,
            notes: row.get(12)?,
        },
    })
}

#[async_trait]
impl AppointmentStore for SqliteAppointmentStore {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment> {
        self.execute(move |conn| {
            let created_at = Utc::now();
            let a = &appointment;

            conn.execute(
                "INSERT INTO appointments (
                    created_at, name, phone, email, location, service_type,
                    vehicle_make, vehicle_model, vehicle_year,
                    preferred_date, preferred_time, notes
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                rusqlite::params![
                    created_at.timestamp_millis(),
                    &a.name,
                    &a.phone,
                    &a.email,
                    &a.location,
                    &a.service_type,
                    &a.vehicle_make,
                    &a.vehicle_model,
                    &a.vehicle_year,
                    &a.preferred_date,
                    &a.preferred_time,
                    &a.notes,
                ],
            )?;

            let id = conn.last_insert_rowid();
            // 存储精度为毫秒
            let created_at = DateTime::from_timestamp_millis(created_at.timestamp_millis())
                .unwrap_or(created_at);

            Ok(Appointment {
                id,
                created_at,
                details: appointment,
            })
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Appointment>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM appointments ORDER BY created_at DESC, id DESC",
                SELECT_COLUMNS
            ))?;

            let rows = stmt.query_map([], row_to_appointment)?;

            let mut appointments = Vec::new();
            for appointment in rows {
                appointments.push(appointment?);
            }
            Ok(appointments)
        })
        .await
    }

    async fn get(&self, id: i64) -> Result<Option<Appointment>> {
        self.execute(move |conn| {
            let appointment = conn
                .query_row(
                    &format!("SELECT {} FROM appointments WHERE id = ?1", SELECT_COLUMNS),
                    [id],
                    row_to_appointment,
                )
                .optional()?;
            Ok(appointment)
        })
        .await
    }
}
