//! Pollable result of `Server::save_async`.

use std::time::Duration;

use log::debug;

use azrm_core::{require, AsyncOperation, AzureError, AzureErrorKind, AzureResult, OperationStatus};

use crate::models::server::Server;

/// Wraps a server whose creation was started but not awaited.
#[derive(Debug)]
pub struct AsyncResponse {
    server: Server,
    operation: Option<AsyncOperation>,
}

impl AsyncResponse {
    pub fn new(server: Server, operation: Option<AsyncOperation>) -> Self {
        Self { server, operation }
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn operation(&self) -> Option<&AsyncOperation> {
        self.operation.as_ref()
    }

    /// Current operation status. Without an operation handle ARM finished the
    /// request synchronously.
    pub async fn status(&self) -> AzureResult<OperationStatus> {
        match &self.operation {
            Some(op) => self.server.service().get_operation_status(op).await,
            None => Ok(OperationStatus::Succeeded),
        }
    }

    pub async fn is_pending(&self) -> AzureResult<bool> {
        Ok(!self.status().await?.is_terminal())
    }

    /// Fetch the provisioned VM and merge it onto the server. Fails unless the
    /// operation has succeeded.
    pub async fn value(mut self) -> AzureResult<Server> {
        match self.status().await? {
            OperationStatus::Succeeded => {}
            OperationStatus::InProgress => {
                return Err(AzureError::new(
                    AzureErrorKind::Validation,
                    "VM creation is still in progress",
                ))
            }
            status => {
                return Err(AzureError::new(
                    AzureErrorKind::ServerError,
                    format!("VM creation ended with status {:?}", status),
                ))
            }
        }
        let a = &self.server.attributes;
        let rg = require("Server", "resource_group", &a.resource_group)?;
        let name = require("Server", "name", &a.name)?;
        let vm = self.server.service().get_virtual_machine(rg, name).await?;
        self.server.refresh_from(&vm);
        Ok(self.server)
    }

    /// Poll every `interval` until the operation is terminal, then `value`.
    pub async fn wait(self, interval: Duration) -> AzureResult<Server> {
        while self.is_pending().await? {
            debug!("waiting for VM creation: {:?}", self.server.attributes.name);
            tokio::time::sleep(interval).await;
        }
        self.value().await
    }
}
