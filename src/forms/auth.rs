use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{EmailAddress, Password, PersonName, PhoneNumber};
use crate::domain::user::{Credentials, NewAccount, ProfileUpdate};
use crate::forms::{FormError, field_error, optional_text};

#[derive(Debug, Deserialize, Validate)]
/// Sign-in form.
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl TryFrom<LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            email: EmailAddress::new(form.email).map_err(field_error(FormError::InvalidEmail))?,
            password: Password::new(form.password)
                .map_err(field_error(FormError::EmptyPassword))?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Self-service registration form.
pub struct SignupForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub firm_name: Option<String>,
}

impl TryFrom<SignupForm> for NewAccount {
    type Error = FormError;

    fn try_from(form: SignupForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: PersonName::new(form.name).map_err(field_error(FormError::InvalidName))?,
            email: EmailAddress::new(form.email).map_err(field_error(FormError::InvalidEmail))?,
            phone: PhoneNumber::new(form.phone)
                .map_err(field_error(FormError::InvalidPhoneNumber))?,
            password: Password::new(form.password)
                .map_err(field_error(FormError::EmptyPassword))?,
            firm_name: optional_text(form.firm_name),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
/// Profile edit form; blank fields are not sent.
pub struct ProfileForm {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub firm_name: Option<String>,
}

impl TryFrom<ProfileForm> for ProfileUpdate {
    type Error = FormError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
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
            firm_name: optional_text(form.firm_name),
        })
    }
}
