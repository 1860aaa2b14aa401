use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use thiserror::Error;

use pedidos_core::{DomainError, Entity, OrderId, ValueObject};

use crate::pricing::line_total;

/// Quantity assumed when the caller does not send one.
pub const DEFAULT_QUANTITY: i32 = 1;

/// Order rule violations.
///
/// Every variant aborts the whole batch it was found in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Código de cliente inválido.")]
    InvalidCustomerCode(i64),

    #[error("Número de controle inválido.")]
    InvalidControlNumber,

    #[error("Nome do cliente é obrigatório.")]
    MissingCustomerName,

    #[error("Quantidade inválida: {0}.")]
    InvalidQuantity(i32),

    #[error("Valor unitário inválido: {0}.")]
    InvalidUnitPrice(Decimal),

    #[error("Valor total excede o limite suportado.")]
    TotalOverflow { unit_price: Decimal, quantity: i32 },
}

/// Customer code, restricted to the inclusive range `[1, 10]`.
///
/// There is no customer registry behind it: the range is the whole check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CustomerCode(i64);

impl CustomerCode {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 10;

    pub fn new(value: i64) -> Result<Self, OrderError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(OrderError::InvalidCustomerCode(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl ValueObject for CustomerCode {}

/// Caller-supplied external identifier of an order. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlNumber(String);

impl ControlNumber {
    pub fn new(value: impl Into<String>) -> Result<Self, OrderError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(OrderError::InvalidControlNumber);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ControlNumber {}

impl core::fmt::Display for ControlNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ControlNumber> for String {
    fn from(value: ControlNumber) -> Self {
        value.0
    }
}

/// An order as submitted by a caller, before any rule ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub control_number: String,
    pub registered_at: Option<NaiveDateTime>,
    pub customer_name: String,
    pub unit_price: Decimal,
    pub quantity: Option<i32>,
    pub customer_code: i64,
}

impl OrderDraft {
    pub fn customer_code(&self) -> Result<CustomerCode, OrderError> {
        CustomerCode::new(self.customer_code)
    }

    pub fn control_number(&self) -> Result<ControlNumber, OrderError> {
        ControlNumber::new(self.control_number.clone())
    }

    /// Fill defaults and price the draft.
    ///
    /// `now` becomes the registration timestamp when the caller sent none; a
    /// missing quantity becomes [`DEFAULT_QUANTITY`]. The uniqueness of the
    /// control number is not checked here (it needs storage).
    pub fn into_new_order(self, now: NaiveDateTime) -> Result<NewOrder, OrderError> {
        let customer_code = self.customer_code()?;
        let control_number = self.control_number()?;

        let registered_at = self.registered_at.unwrap_or(now);
        let quantity = self.quantity.unwrap_or(DEFAULT_QUANTITY);

        if self.customer_name.trim().is_empty() {
            return Err(OrderError::MissingCustomerName);
        }
        if quantity < DEFAULT_QUANTITY {
            return Err(OrderError::InvalidQuantity(quantity));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(OrderError::InvalidUnitPrice(self.unit_price));
        }

        let total_price =
            line_total(self.unit_price, quantity).ok_or(OrderError::TotalOverflow {
                unit_price: self.unit_price,
                quantity,
            })?;

        Ok(NewOrder {
            control_number,
            registered_at,
            customer_name: self.customer_name,
            unit_price: self.unit_price,
            quantity,
            customer_code,
            total_price,
        })
    }
}

/// A validated, normalized and priced order that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub control_number: ControlNumber,
    pub registered_at: NaiveDateTime,
    pub customer_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub customer_code: CustomerCode,
    /// Discounted line total.
    pub total_price: Decimal,
}

impl NewOrder {
    /// Attach the identifier assigned by storage.
    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            control_number: self.control_number,
            registered_at: self.registered_at,
            customer_name: self.customer_name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            customer_code: self.customer_code,
            total_price: self.total_price,
        }
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    control_number: ControlNumber,
    registered_at: NaiveDateTime,
    customer_name: String,
    unit_price: Decimal,
    quantity: i32,
    customer_code: CustomerCode,
    total_price: Decimal,
}

impl Order {
    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn control_number(&self) -> &ControlNumber {
        &self.control_number
    }

    pub fn registered_at(&self) -> NaiveDateTime {
        self.registered_at
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn customer_code(&self) -> CustomerCode {
        self.customer_code
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Raw stored representation of an order, as read back from a storage row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: i64,
    pub control_number: String,
    pub registered_at: NaiveDateTime,
    pub customer_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub customer_code: i64,
    pub total_price: Decimal,
}

impl TryFrom<OrderRecord> for Order {
    type Error = DomainError;

    /// Rehydrate a stored row, rejecting rows that break the order invariants.
    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let customer_code = CustomerCode::new(record.customer_code).map_err(|e| {
            DomainError::invariant(format!("order {}: {e}", record.id))
        })?;
        let control_number = ControlNumber::new(record.control_number).map_err(|e| {
            DomainError::invariant(format!("order {}: {e}", record.id))
        })?;
        if record.quantity < DEFAULT_QUANTITY {
            return Err(DomainError::invariant(format!(
                "order {}: quantity {} below minimum",
                record.id, record.quantity
            )));
        }

        Ok(Order {
            id: OrderId::from_i64(record.id),
            control_number,
            registered_at: record.registered_at,
            customer_name: record.customer_name,
            unit_price: record.unit_price,
            quantity: record.quantity,
            customer_code,
            total_price: record.total_price,
        })
    }
}
