//! 预约存储接口定义
//!
//! 预约请求持久化的抽象接口，支持内存和SQLite实现

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Appointment, NewAppointment};

pub mod memory;

pub use memory::MemoryAppointmentStore;

/// 预约存储 trait
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// 保存新预约并返回存储后的记录
    async fn create(&self, appointment: NewAppointment) -> Result<Appointment>;

    /// 全部预约，最新的在前
    async fn list(&self) -> Result<Vec<Appointment>>;

    /// 查询单条预约
    async fn get(&self, id: i64) -> Result<Option<Appointment>>;
}
