//! Merge variables and the send-template request body

use serde::Serialize;

use crate::config::MandrillConfig;
use crate::order::{format_money, Address, Order};

use super::types::{MailerError, MailerResult, TemplateVariable};

const SHIP_ADDRESS_PREFIX: &str = "ship_address";
const BILL_ADDRESS_PREFIX: &str = "bill_address";

/// Merge tag syntax the templates are written in
const MERGE_LANGUAGE: &str = "mailchimp";

/// Builds the template payload for a single order.
///
/// Construction checks the API key up front, so a builder that exists can
/// always produce a complete request.
pub struct PayloadBuilder<'a> {
    order: &'a Order,
    message_id: String,
    config: &'a MandrillConfig,
    api_key: String,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(
        order: &'a Order,
        message_id: impl Into<String>,
        config: &'a MandrillConfig,
    ) -> MailerResult<Self> {
        let api_key = config.api_key().ok_or(MailerError::Authentication)?;

        Ok(Self {
            order,
            message_id: message_id.into(),
            config,
            api_key: api_key.to_string(),
        })
    }

    /// All template variables for the order, in the order the template expects
    pub fn build_merge_variables(&self) -> Vec<TemplateVariable> {
        let order = self.order;
        let mut vars = Vec::new();

        vars.extend(address_variables(SHIP_ADDRESS_PREFIX, &order.ship_address));
        vars.extend(address_variables(BILL_ADDRESS_PREFIX, &order.bill_address));
        vars.extend(order.adjustments.iter().map(|adjustment| {
            TemplateVariable::new(
                format!("adjustment_{}", adjustment.label.to_lowercase()),
                format_money(adjustment.amount),
            )
        }));

        vars.push(TemplateVariable::new("order_number", order.number.to_string()));
        vars.push(TemplateVariable::new("item_total", format_money(order.item_total)));
        vars.push(TemplateVariable::new("total", format_money(order.total)));
        vars.push(TemplateVariable::new(
            "backordered",
            order.is_backordered().to_string(),
        ));
        vars.push(TemplateVariable::new("line_item_rows", self.line_item_rows()));

        vars
    }

    /// One table row per line item: name, quantity, unit price
    fn line_item_rows(&self) -> String {
        self.order
            .line_items
            .iter()
            .map(|item| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape_html(&item.variant.name),
                    item.quantity,
                    format_money(item.price)
                )
            })
            .collect()
    }

    /// Wrap merge variables into the send-template request body
    pub fn build_request(&self, merge_vars: Vec<TemplateVariable>) -> SendTemplateRequest {
        let to = self
            .order
            .email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
            .map(|email| Recipient {
                email: email.to_string(),
                name: Some(self.order.ship_address.full_name()).filter(|name| !name.is_empty()),
                kind: "to",
            })
            .into_iter()
            .collect();

        SendTemplateRequest {
            key: self.api_key.clone(),
            template_name: self.config.template_name.clone(),
            template_content: Vec::new(),
            message: TemplateMessage {
                to,
                from_email: self.config.from_email.clone(),
                from_name: self.config.from_name.clone(),
                subject: self.config.subject.clone(),
                global_merge_vars: merge_vars,
                merge_language: MERGE_LANGUAGE,
                metadata: RequestMetadata {
                    message_id: self.message_id.clone(),
                    order_number: self.order.number.to_string(),
                },
            },
        }
    }
}

fn address_variables(prefix: &str, address: &Address) -> Vec<TemplateVariable> {
    [
        ("first_name", address.firstname.as_str()),
        ("last_name", address.lastname.as_str()),
        ("company", address.company.as_str()),
        ("address1", address.address1.as_str()),
        ("address2", address.address2.as_str()),
        ("city", address.city.as_str()),
        ("state", address.region.as_str()),
        ("country", address.country.iso.as_str()),
        ("zipcode", address.zipcode.as_str()),
    ]
    .into_iter()
    .map(|(suffix, content)| TemplateVariable::new(format!("{}_{}", prefix, suffix), content))
    .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Body of `POST /messages/send-template.json`
#[derive(Serialize)]
pub struct SendTemplateRequest {
    pub key: String,
    pub template_name: String,
    /// Editable template regions; always empty, content comes from merge variables
    pub template_content: Vec<TemplateVariable>,
    pub message: TemplateMessage,
}

#[derive(Debug, Serialize)]
pub struct TemplateMessage {
    pub to: Vec<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub global_merge_vars: Vec<TemplateVariable>,
    pub merge_language: &'static str,
    pub metadata: RequestMetadata,
}

#[derive(Debug, Serialize)]
pub struct Recipient {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RequestMetadata {
    pub message_id: String,
    pub order_number: String,
}
