use super::{Priority, Resolution, Ticket, TicketId};
use chrono::{NaiveDate, NaiveDateTime};

/// Builder for creating Ticket instances
#[derive(Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    customer_name: Option<String>,
    email: Option<String>,
    product: Option<String>,
    purchase_date: Option<NaiveDate>,
    description: Option<String>,
    priority: Option<Priority>,
    queued_at: Option<i64>,
    resolution: Option<Resolution>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket ID
    #[must_use]
    pub const fn id(mut self, id: TicketId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the customer name
    #[must_use]
    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Set the requester email
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the catalog product key
    #[must_use]
    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Set the purchase date
    #[must_use]
    pub const fn purchase_date(mut self, date: NaiveDate) -> Self {
        self.purchase_date = Some(date);
        self
    }

    /// Set the description; commas become semicolons so the flat field survives
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into().replace(',', ";"));
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the queue-entry time in Unix seconds
    #[must_use]
    pub const fn queued_at(mut self, secs: i64) -> Self {
        self.queued_at = Some(secs);
        self
    }

    /// Stamp the resolution
    #[must_use]
    pub fn resolved(mut self, at: NaiveDateTime, by: impl Into<String>) -> Self {
        self.resolution = Some(Resolution {
            resolved_at: at,
            resolved_by: by.into(),
        });
        self
    }

    /// Build the ticket
    pub fn build(self) -> Ticket {
        Ticket {
            id: self.id.unwrap_or(TicketId::new(0)),
            customer_name: self.customer_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            product: self.product.unwrap_or_default(),
            purchase_date: self.purchase_date.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            priority: self.priority,
            queued_at: self.queued_at,
            resolution: self.resolution,
        }
    }
}
