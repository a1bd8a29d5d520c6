use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::{CustomerUpdate, NewCustomer};
use crate::domain::types::{EmailAddress, Password, PersonName, PhoneNumber};
use crate::forms::{FormError, field_error, optional_text};

#[derive(Debug, Deserialize, Validate)]
/// Form data for adding a new customer.
pub struct CustomerForm {
    /// Customer display name.
    #[validate(length(min = 1))]
    pub name: String,
    /// Contact email, also used as the customer's login.
    #[validate(email)]
    pub email: String,
    /// Contact phone number.
    #[validate(length(min = 1))]
    pub phone: String,
    /// Optional initial password.
    #[serde(default)]
    pub password: Option<String>,
}

impl TryFrom<CustomerForm> for NewCustomer {
    type Error = FormError;

    fn try_from(form: CustomerForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: PersonName::new(form.name).map_err(field_error(FormError::InvalidName))?,
            email: EmailAddress::new(form.email).map_err(field_error(FormError::InvalidEmail))?,
            phone: PhoneNumber::new(form.phone)
                .map_err(field_error(FormError::InvalidPhoneNumber))?,
            password: optional_text(form.password)
                .map(Password::new)
                .transpose()
                .map_err(field_error(FormError::EmptyPassword))?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
/// Form data for editing an existing customer; blank fields are not sent.
pub struct EditCustomerForm {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<EditCustomerForm> for CustomerUpdate {
    type Error = FormError;

    fn try_from(form: EditCustomerForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: optional_text(form.name)
                .map(PersonName::new)
                .transpose()
                .map_err(field_error(FormError::InvalidName))?,
            email: optional_text(form.email)
                .map(EmailAddress::new)
                .transpose()
                .map_err(field_error(FormError::InvalidEmail))?,
            phone: optional_text(form.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(field_error(FormError::InvalidPhoneNumber))?,
            password: optional_text(form.password)
                .map(Password::new)
                .transpose()
                .map_err(field_error(FormError::EmptyPassword))?,
        })
    }
}
