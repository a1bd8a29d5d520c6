use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::matter::{MatterState, MatterUpdate, NewMatter};
use crate::domain::types::MatterTitle;
use crate::forms::{FormError, field_error, optional_text};

fn parse_state(value: &str) -> Result<MatterState, FormError> {
    value.trim().parse().map_err(field_error(FormError::InvalidState))
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, FormError> {
    optional_text(value)
        .map(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d"))
        .transpose()
        .map_err(|_| FormError::InvalidDueDate)
}

#[derive(Debug, Deserialize, Validate)]
/// Form data for opening a matter.
pub struct MatterForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Wire name of the state; defaults to `new`.
    #[serde(default)]
    pub state: Option<String>,
    /// Due date as `YYYY-MM-DD`.
    #[serde(default)]
    pub due_date: Option<String>,
}

impl TryFrom<MatterForm> for NewMatter {
    type Error = FormError;

    fn try_from(form: MatterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let state = match optional_text(form.state) {
            Some(raw) => parse_state(&raw)?,
            None => MatterState::default(),
        };
        Ok(Self {
            title: MatterTitle::new(form.title).map_err(field_error(FormError::InvalidTitle))?,
            description: optional_text(form.description),
            state,
            due_date: parse_date(form.due_date)?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
/// Form data for editing a matter; blank fields are not sent.
pub struct EditMatterForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub due_date: Option<String>,
}

impl TryFrom<EditMatterForm> for MatterUpdate {
    type Error = FormError;

    fn try_from(form: EditMatterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            title: optional_text(form.title)
                .map(MatterTitle::new)
                .transpose()
                .map_err(field_error(FormError::InvalidTitle))?,
            description: optional_text(form.description),
            state: optional_text(form.state)
                .map(|raw| parse_state(&raw))
                .transpose()?,
            due_date: parse_date(form.due_date)?,
        })
    }
}
