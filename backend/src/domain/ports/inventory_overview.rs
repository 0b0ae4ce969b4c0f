//! Driving port for read-only inventory views.

use async_trait::async_trait;

use crate::domain::{Error, InventoryExport, OverviewRow};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryOverview: Send + Sync {
    /// Every key joined with every holder, in display order.
    async fn overview(&self) -> Result<Vec<OverviewRow>, Error>;

    /// All four collections read from one consistent snapshot.
    async fn export(&self) -> Result<InventoryExport, Error>;
}
