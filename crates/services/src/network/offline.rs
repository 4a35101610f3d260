use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::Network;
use crate::error::NetworkError;
use crate::gateway::{GatewayRequest, GatewayResponse};

/// Wraps a network and fails every fetch while switched offline.
#[derive(Clone)]
pub struct OfflineSwitch {
    inner: Arc<dyn Network>,
    online: Arc<AtomicBool>,
}

impl OfflineSwitch {
    /// Starts online.
    #[must_use]
    pub fn new(inner: Arc<dyn Network>) -> Self {
        Self {
            inner,
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
        log::info!("network switched {}", if online { "online" } else { "offline" });
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for OfflineSwitch {
    async fn fetch(&self, request: &GatewayRequest) -> Result<GatewayResponse, NetworkError> {
        if !self.is_online() {
            return Err(NetworkError::Offline);
        }
        self.inner.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::MemoryNetwork;

    #[tokio::test]
    async fn offline_fetches_fail_without_reaching_the_origin() {
        let origin = MemoryNetwork::new().with_file("/a.json", "{}");
        let switch = OfflineSwitch::new(Arc::new(origin.clone()));
        let request = GatewayRequest::get("/a.json").unwrap();

        switch.set_online(false);
        assert!(matches!(
            switch.fetch(&request).await,
            Err(NetworkError::Offline)
        ));
        assert_eq!(origin.fetch_count(), 0);

        switch.set_online(true);
        assert_eq!(switch.fetch(&request).await.unwrap().status, 200);
    }
}
