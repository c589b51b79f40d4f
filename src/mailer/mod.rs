//! Order confirmation delivery through the Mandrill template API.
//!
//! A delivery runs in three steps:
//! - [`PayloadBuilder`] flattens an order into named template variables
//! - a [`Transport`] submits the send-template request
//! - [`ResponseNormalizer`] reduces the provider answer to a [`DeliveryResult`]
//!
//! [`OrderMailer`] wires the steps together for one order.

mod payload;
mod response;
mod sender;
mod transport;
mod types;

pub use payload::{PayloadBuilder, Recipient, SendTemplateRequest, TemplateMessage};
pub use response::{DeliveryOutcome, RawResponse, ResponseNormalizer};
pub use sender::OrderMailer;
pub use transport::{HttpTransport, Transport, SEND_TEMPLATE_PATH};
pub use types::{
    DeliveryResult, MailerError, MailerResult, ResultMessage, TemplateVariable, TransportError,
};
