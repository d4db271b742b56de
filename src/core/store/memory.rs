//! 内存预约存储
//!
//! 数据只保存在内存中，重启后丢失

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{Appointment, NewAppointment};

use super::AppointmentStore;

/// 内存存储，适合测试和演示
pub struct MemoryAppointmentStore {
    appointments: RwLock<Vec<Appointment>>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self {
            appointments: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryAppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentStore for MemoryAppointmentStore {
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment> {
        let mut appointments = self.appointments.write().await;
        let id = appointments.last().map_or(1, |a| a.id + 1);

        let stored = Appointment {
            id,
            created_at: Utc::now(),
            details: appointment,
        };
        appointments.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        // 插入顺序即创建顺序
        Ok(appointments.iter().rev().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(appointments.iter().find(|a| a.id == id).cloned())
    }
}
