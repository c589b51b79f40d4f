use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::money::Money;
use super::wrapped::{deserialize_unwrapped, Wrapped};

/// Shipment state that marks an order as waiting on stock
const BACKORDER_STATE: &str = "backorder";

/// Order identifier, kept exactly as the storefront sent it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderNumber {
    Text(String),
    Numeric(Number),
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderNumber::Text(number) => f.write_str(number),
            OrderNumber::Numeric(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for OrderNumber {
    fn from(number: &str) -> Self {
        OrderNumber::Text(number.to_string())
    }
}

/// A completed storefront order
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub number: OrderNumber,
    /// Customer email address, the recipient of the confirmation
    #[serde(default)]
    pub email: Option<String>,
    pub item_total: Money,
    pub total: Money,
    #[serde(default)]
    pub shipment_state: Option<String>,
    pub ship_address: Address,
    pub bill_address: Address,
    #[serde(default, deserialize_with = "deserialize_unwrapped")]
    pub adjustments: Vec<Adjustment>,
    #[serde(default, deserialize_with = "deserialize_unwrapped")]
    pub line_items: Vec<LineItem>,
}

impl Order {
    pub fn is_backordered(&self) -> bool {
        self.shipment_state.as_deref() == Some(BACKORDER_STATE)
    }
}

/// How an address names its state or province
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// Free-text name, used when the address has no `state_id`
    Named(String),
    /// Abbreviation of the referenced state record
    Abbreviated(String),
}

impl Region {
    pub fn as_str(&self) -> &str {
        match self {
            Region::Named(name) => name,
            Region::Abbreviated(abbr) => abbr,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "AddressRecord")]
pub struct Address {
    pub firstname: String,
    pub lastname: String,
    pub company: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub zipcode: String,
    pub region: Region,
    pub country: Country,
}

impl Address {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    pub iso: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateRef {
    pub abbr: String,
}

/// Address as it appears on the wire; nullable text reads as empty
#[derive(Deserialize)]
struct AddressRecord {
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    lastname: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    address1: Option<String>,
    #[serde(default)]
    address2: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    zipcode: Option<String>,
    #[serde(default)]
    state_id: Option<Value>,
    #[serde(default)]
    state_name: Option<String>,
    #[serde(default)]
    state: Option<StateRef>,
    country: Country,
}

impl TryFrom<AddressRecord> for Address {
    type Error = String;

    fn try_from(record: AddressRecord) -> Result<Self, Self::Error> {
        let region = match record.state_id {
            None => Region::Named(record.state_name.unwrap_or_default()),
            Some(state_id) => match record.state {
                Some(state) => Region::Abbreviated(state.abbr),
                None => {
                    return Err(format!(
                        "address references state_id {} but carries no state",
                        state_id
                    ))
                }
            },
        };

        Ok(Address {
            firstname: record.firstname.unwrap_or_default(),
            lastname: record.lastname.unwrap_or_default(),
            company: record.company.unwrap_or_default(),
            address1: record.address1.unwrap_or_default(),
            address2: record.address2.unwrap_or_default(),
            city: record.city.unwrap_or_default(),
            zipcode: record.zipcode.unwrap_or_default(),
            region,
            country: record.country,
        })
    }
}

/// Price modifier on an order (tax, shipping, promotion)
#[derive(Debug, Clone, Deserialize)]
pub struct Adjustment {
    pub label: String,
    pub amount: Money,
}

impl Wrapped for Adjustment {
    const WRAPPER_KEY: &'static str = "adjustment";
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    pub variant: Variant,
    pub quantity: Quantity,
    pub price: Money,
}

/// Line item quantity, rendered exactly as sent
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Count(Number),
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Count(count) => write!(f, "{}", count),
            Quantity::Text(text) => f.write_str(text),
        }
    }
}

impl Wrapped for LineItem {
    const WRAPPER_KEY: &'static str = "line_item";
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
    pub name: String,
}
