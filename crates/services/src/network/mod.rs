//! Network adapters the gateway fetches through.

use async_trait::async_trait;

use crate::error::NetworkError;
use crate::gateway::{GatewayRequest, GatewayResponse};

mod directory;
mod http;
mod memory;
mod offline;

pub use directory::DirectoryNetwork;
pub use http::{DEFAULT_FETCH_TIMEOUT, HttpNetwork};
pub use memory::MemoryNetwork;
pub use offline::OfflineSwitch;

/// Origin of static content.
///
/// A non-2xx status is a successful fetch; only transport failures are errors.
#[async_trait]
pub trait Network: Send + Sync {
    /// Fetch `request` from the origin.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` when the origin cannot be reached.
    async fn fetch(&self, request: &GatewayRequest) -> Result<GatewayResponse, NetworkError>;
}

/// Content type guessed from a file extension.
pub(crate) fn content_type_for(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "ogg" => "audio/ogg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "txt" => "text/plain; charset=utf-8",
        _ => return None,
    };
    Some(mime)
}
