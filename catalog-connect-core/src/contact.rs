//! Contacts and the roles they hold on an item.

use crate::validation;
use crate::ConnectorResult;
use serde::{Deserialize, Serialize};

/// A person or group reachable by email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contact {
    name: Option<String>,
    email: String,
    phone_number: Option<String>,
}

impl Contact {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }
}

/// The role a contact holds, e.g. "owner" or "steward".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    name: String,
}

impl Role {
    pub fn new(name: impl Into<String>) -> ConnectorResult<Self> {
        let name = name.into();
        validation::non_empty("role", &name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A contact paired with its role on an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactRelation {
    contact: Contact,
    role: Role,
}

impl ContactRelation {
    pub fn builder() -> ContactRelationBuilder {
        ContactRelationBuilder::default()
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn role(&self) -> &Role {
        &self.role
    }
}

#[derive(Debug, Default)]
pub struct ContactRelationBuilder {
    role: Option<String>,
    name: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
}

impl ContactRelationBuilder {
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Build the relation; email and role are required.
    pub fn build(self) -> ConnectorResult<ContactRelation> {
        let email = validation::required_non_empty("email", self.email)?;
        let role = Role::new(validation::required("role", self.role)?)?;

        Ok(ContactRelation {
            contact: Contact {
                name: self.name,
                email,
                phone_number: self.phone_number,
            },
            role,
        })
    }
}
