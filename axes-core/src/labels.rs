//! Display names for the record types and their fields.
//!
//! English names are the defaults. Russian and Ukrainian carry extended
//! forms used by admin screens for the "add", "delete" and "change" actions,
//! since those languages inflect the noun differently for each.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    AccessAttempt,
    AccessLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
    Uk,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::Uk => "uk",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            "uk" => Ok(Locale::Uk),
            other => Err(ValidationError::InvalidField(format!(
                "unsupported locale: {other}"
            ))),
        }
    }
}

/// Grammatical gender of the inflected noun, used to agree adjectives such as
/// "new" or "selected" in admin messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    He,
    She,
    It,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::He => "he",
            Gender::She => "she",
            Gender::It => "it",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelLabels {
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedNames {
    pub add: &'static str,
    pub delete: &'static str,
    pub change: &'static str,
    pub gender: Gender,
}

const ACCESS_ATTEMPT_LABELS: ModelLabels = ModelLabels {
    verbose_name: "access attempt",
    verbose_name_plural: "access attempts",
};

const ACCESS_LOG_LABELS: ModelLabels = ModelLabels {
    verbose_name: "access log",
    verbose_name_plural: "access logs",
};

const ACCESS_ATTEMPT_RU: ExtendedNames = ExtendedNames {
    add: "попытку войти",
    delete: "попытку войти",
    change: "попытку войти",
    gender: Gender::She,
};

const ACCESS_ATTEMPT_UK: ExtendedNames = ExtendedNames {
    add: "спробу ввійти",
    delete: "спробу війти",
    change: "спробу війти",
    gender: Gender::She,
};

const ACCESS_LOG_RU: ExtendedNames = ExtendedNames {
    add: "историю входа",
    delete: "историю входа",
    change: "историю входа",
    gender: Gender::She,
};

const ACCESS_LOG_UK: ExtendedNames = ExtendedNames {
    add: "історію входу",
    delete: "історію входу",
    change: "історію входу",
    gender: Gender::She,
};

pub fn model_labels(model: Model) -> &'static ModelLabels {
    match model {
        Model::AccessAttempt => &ACCESS_ATTEMPT_LABELS,
        Model::AccessLog => &ACCESS_LOG_LABELS,
    }
}

/// Inflected names for `locale`, or `None` when the plain verbose name is used.
pub fn extended_names(model: Model, locale: Locale) -> Option<&'static ExtendedNames> {
    match (model, locale) {
        (_, Locale::En) => None,
        (Model::AccessAttempt, Locale::Ru) => Some(&ACCESS_ATTEMPT_RU),
        (Model::AccessAttempt, Locale::Uk) => Some(&ACCESS_ATTEMPT_UK),
        (Model::AccessLog, Locale::Ru) => Some(&ACCESS_LOG_RU),
        (Model::AccessLog, Locale::Uk) => Some(&ACCESS_LOG_UK),
    }
}

/// Display name of a record field, by column name.
pub fn field_label(field: &str) -> Option<&'static str> {
    let label = match field {
        "user_agent" => "user agent",
        "ip_address" => "IP address",
        "username" => "username",
        "trusted" => "trusted",
        "http_accept" => "HTTP Accept",
        "path_info" => "path",
        "attempt_time" => "attempt time",
        "get_data" => "GET data",
        "post_data" => "POST data",
        "failures_since_start" => "failed logins",
        "logout_time" => "logout time",
        _ => return None,
    };
    Some(label)
}
