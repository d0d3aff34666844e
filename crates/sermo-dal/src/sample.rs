use std::ops::{Deref, DerefMut};

use garde::Validate;
use sermo_types::general::{ShortText, ValidEmail, ValidSlug};
use serde::{Deserialize, Serialize};

fn is_finite(value: &f64, _ctx: &()) -> garde::Result {
    if value.is_finite() {
        Ok(())
    } else {
        Err(garde::Error::new("must be a finite number"))
    }
}

/// Validated input for creating or fully replacing a sample.
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateSample {
    #[garde(dive)]
    pub text: ShortText,
    #[garde(skip)]
    pub number: i64,
    #[garde(skip)]
    pub is_something: bool,
    #[garde(dive)]
    pub email: ValidEmail,
    #[garde(dive)]
    pub slug: ValidSlug,
    #[garde(custom(is_finite))]
    pub real: f64,
    #[garde(dive)]
    pub password: ShortText,
}

/// Value of the derived `generated` column.
pub fn generated_value(slug: &str, number: i64) -> String {
    format!("{slug}:{number}")
}

/// Stored columns of a sample, everything except the id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct SampleData {
    pub text: String,
    pub number: i64,
    pub is_something: bool,
    pub email: String,
    pub slug: String,
    pub real: f64,
    pub password: String,
    pub generated: String,
}

impl SampleData {
    /// Must run after all other fields are assigned and before the record is stored.
    pub fn recompute_generated(&mut self) {
        self.generated = generated_value(&self.slug, self.number);
    }

    /// Overwrites every field except `generated`.
    pub fn assign(&mut self, payload: CreateSample) {
        self.text = payload.text.into();
        self.number = payload.number;
        self.is_something = payload.is_something;
        self.email = payload.email.into();
        self.slug = payload.slug.into();
        self.real = payload.real;
        self.password = payload.password.into();
    }
}

impl From<CreateSample> for SampleData {
    fn from(payload: CreateSample) -> Self {
        let mut data = SampleData {
            text: payload.text.into(),
            number: payload.number,
            is_something: payload.is_something,
            email: payload.email.into(),
            slug: payload.slug.into(),
            real: payload.real,
            password: payload.password.into(),
            generated: String::new(),
        };
        data.recompute_generated();
        data
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Sample {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub data: SampleData,
}

impl Deref for Sample {
    type Target = SampleData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl DerefMut for Sample {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}
