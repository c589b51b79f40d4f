use std::sync::Arc;

use crate::config::Settings;
use crate::mailer::{HttpTransport, OrderMailer, Transport, TransportError};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub mailer: Arc<OrderMailer>,
}

impl AppState {
    /// State backed by the HTTP transport to the configured Mandrill endpoint
    pub fn new(settings: Settings) -> Result<Self, TransportError> {
        let transport = Arc::new(HttpTransport::new(&settings.mandrill)?);
        Ok(Self::with_transport(settings, transport))
    }

    pub fn with_transport(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        let mailer = Arc::new(OrderMailer::new(transport, settings.mandrill.clone()));

        Self {
            settings: Arc::new(settings),
            mailer,
        }
    }
}
